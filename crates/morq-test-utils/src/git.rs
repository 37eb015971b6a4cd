//! Git repository fixtures built with the `git` CLI.
//!
//! Fixtures shell out to `git` so that the state under test is produced by the
//! reference implementation rather than by the code being tested.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Run `git <args>` in `dir` and return trimmed stdout.
///
/// # Panics
/// Panics if git cannot be spawned or exits unsuccessfully.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "git: `git {args:?}` failed in {}:\n{}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Configure a throwaway identity so commits work on CI machines.
pub fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "tag.gpgsign", "false"]);
}

/// Full object id of `HEAD` in `dir`.
pub fn head_id(dir: &Path) -> String {
    git(dir, &["rev-parse", "HEAD"])
}

/// Clone `url` into `dest` with the `git` CLI and configure an identity.
pub fn clone_checkout(url: &str, dest: &Path) {
    let parent = dest.parent().expect("clone_checkout: destination has no parent");
    let dest_str = dest.to_string_lossy().to_string();
    git(parent, &["clone", "--quiet", url, &dest_str]);
    configure_identity(dest);
}

/// Creates a `.git` directory that looks like a repository marker but has no
/// object store, so it cannot be opened.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_git_dir(path: &Path) {
    fs::create_dir_all(path.join(".git/refs/heads"))
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to create refs/heads: {e}"));
    fs::write(path.join(".git/HEAD"), "ref: refs/heads/main\n")
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to write HEAD: {e}"));
}

/// A source repository that test checkouts clone and fetch from.
///
/// Starts with a `main` branch holding a single commit of `README.md`.
pub struct Upstream {
    temp_dir: TempDir,
    counter: std::cell::Cell<u32>,
}

impl Default for Upstream {
    fn default() -> Self {
        Self::new()
    }
}

impl Upstream {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Upstream::new: failed to create temp dir");
        let path = temp_dir.path();

        git(path, &["init", "--quiet"]);
        // Independent of the host's init.defaultBranch
        git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        configure_identity(path);

        fs::write(path.join("README.md"), "# Upstream\n")
            .unwrap_or_else(|e| panic!("Upstream::new: failed to write README.md: {e}"));
        git(path, &["add", "."]);
        git(path, &["commit", "--quiet", "-m", "Initial commit"]);

        Self {
            temp_dir,
            counter: std::cell::Cell::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Clone URL for this repository (a local path).
    pub fn url(&self) -> String {
        self.path().to_string_lossy().to_string()
    }

    /// Add a commit on the currently checked-out branch and return its id.
    pub fn commit(&self) -> String {
        let n = self.counter.get() + 1;
        self.counter.set(n);
        let file = format!("change-{n}.txt");
        fs::write(self.path().join(&file), format!("change {n}\n"))
            .unwrap_or_else(|e| panic!("Upstream::commit: failed to write {file}: {e}"));
        git(self.path(), &["add", &file]);
        git(self.path(), &["commit", "--quiet", "-m", &format!("Change {n}")]);
        self.head()
    }

    /// Add `count` commits and return the id of the last one.
    pub fn commits(&self, count: usize) -> String {
        let mut last = self.head();
        for _ in 0..count {
            last = self.commit();
        }
        last
    }

    /// Create an annotated tag at `HEAD`.
    pub fn tag(&self, name: &str) {
        git(self.path(), &["tag", "-a", name, "-m", &format!("Release {name}")]);
    }

    /// Create a branch at `HEAD` without switching to it.
    pub fn branch(&self, name: &str) {
        git(self.path(), &["branch", name]);
    }

    /// Switch the upstream working tree to `name`.
    pub fn switch(&self, name: &str) {
        git(self.path(), &["checkout", "--quiet", name]);
    }

    pub fn head(&self) -> String {
        head_id(self.path())
    }
}

/// A directory that holds a manifest and the checkouts it declares.
pub struct WorkspaceDir {
    temp_dir: TempDir,
}

impl Default for WorkspaceDir {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("WorkspaceDir::new: failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn folder(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Write `manifest.json` declaring `(name, url, ref)` entries in order.
    pub fn write_manifest(&self, entries: &[(&str, &str, &str)]) -> PathBuf {
        let mut repos = serde_json::Map::new();
        for (name, url, reference) in entries {
            repos.insert(
                name.to_string(),
                serde_json::json!({ "url": url, "ref": reference }),
            );
        }
        self.write_manifest_value(&serde_json::json!({ "repos": repos }))
    }

    /// Write an arbitrary JSON document as `manifest.json`.
    pub fn write_manifest_value(&self, value: &serde_json::Value) -> PathBuf {
        let path = self.root().join("manifest.json");
        let content = serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| panic!("write_manifest_value: failed to serialize: {e}"));
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("write_manifest_value: failed to write manifest: {e}"));
        path
    }

    /// Clone `upstream` into the folder `name` using the `git` CLI.
    pub fn clone_from(&self, upstream: &Upstream, name: &str) -> PathBuf {
        let dest = self.folder(name);
        clone_checkout(&upstream.url(), &dest);
        dest
    }
}
