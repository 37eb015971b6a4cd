//! Read-only probing of a local checkout
//!
//! [`Checkout::probe`] discovers whether a folder holds a usable repository and
//! the query methods observe its state without touching the working tree.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use git2::{BranchType, ErrorCode, Oid, Repository, Sort, StatusOptions};

use crate::reference::{self, ReferenceKind, ReferenceLookup};
use crate::Result;

/// Length of the abbreviated commit ids shown in reports.
pub const SHORT_ID_LEN: usize = 8;

/// A live local checkout, owned by the folder it occupies.
pub struct Checkout {
    repo: Repository,
    path: PathBuf,
}

impl std::fmt::Debug for Checkout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkout").field("path", &self.path).finish()
    }
}

impl Checkout {
    /// Open the checkout at `path`, or `None` if there is none.
    ///
    /// A missing folder and a folder that is not a repository both yield
    /// `None`; they are only distinguished in the logs. Parent directories are
    /// not searched, so a plain folder nested inside another repository is
    /// still absent.
    pub fn probe(path: &Path) -> Option<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Missing repository folder");
            return None;
        }

        match Repository::open(path) {
            Ok(repo) => Some(Self::from_repository(repo, path)),
            Err(e) if e.code() == ErrorCode::NotFound => {
                tracing::debug!(path = %path.display(), "Folder is not a git repository");
                None
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Failed to open repository");
                None
            }
        }
    }

    pub(crate) fn from_repository(repo: Repository, path: &Path) -> Self {
        Self {
            repo,
            path: path.to_path_buf(),
        }
    }

    pub(crate) fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Folder this checkout occupies.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Folder name, used in log lines.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Commit `HEAD` points at.
    pub fn head_id(&self) -> Result<Oid> {
        Ok(self.repo.head()?.peel_to_commit()?.id())
    }

    /// Abbreviated id of the commit `HEAD` points at.
    pub fn short_head_id(&self) -> Result<String> {
        let id = self.head_id()?.to_string();
        Ok(id[..SHORT_ID_LEN.min(id.len())].to_string())
    }

    /// Name of the active branch, or `None` when `HEAD` is detached.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = self.repo.head()?;

        if head.is_branch() {
            Ok(Some(head.shorthand().unwrap_or("HEAD").to_string()))
        } else {
            Ok(None)
        }
    }

    /// Short names of every reference: local branches, tags, and
    /// remote-tracking branches such as `origin/main`.
    pub fn reference_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for reference in self.repo.references()? {
            let reference = reference?;
            if let Some(name) = reference.shorthand() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    /// Whether `reference` names something this checkout knows about.
    ///
    /// True for any reference short name and for anything that resolves to a
    /// commit.
    pub fn is_known_reference(&self, reference: &str) -> bool {
        match self.reference_names() {
            Ok(names) if names.iter().any(|n| n == reference) => true,
            Ok(_) => self.resolve_commit(reference).is_some(),
            Err(e) => {
                tracing::debug!(repo = %self.name(), error = %e, "Failed to list references");
                false
            }
        }
    }

    /// Classify `reference` as a branch, tag, commit or unknown.
    pub fn classify_reference(&self, reference: &str) -> ReferenceKind {
        reference::classify(self, reference)
    }

    /// Signed distance between `HEAD` and `reference`.
    ///
    /// Negative when `HEAD` is behind by that many commits, positive when
    /// ahead, zero when both point at the same history position. The behind
    /// count is computed first and returned as soon as it is nonzero, so a
    /// diverged checkout reports only how far behind it is.
    pub fn commits_ahead_behind(&self, reference: &str) -> Result<i64> {
        let target = self.repo.revparse_single(reference)?.peel_to_commit()?.id();
        let head = self.head_id()?;

        let behind = self.count_exclusive(target, head)?;
        if behind > 0 {
            return Ok(-(behind as i64));
        }

        let ahead = self.count_exclusive(head, target)?;
        Ok(ahead as i64)
    }

    /// Commits reachable from `from` but not from `hidden`.
    fn count_exclusive(&self, from: Oid, hidden: Oid) -> Result<usize> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::NONE)?;
        revwalk.push(from)?;
        revwalk.hide(hidden)?;

        let mut count = 0;
        for oid in revwalk {
            oid?;
            count += 1;
        }
        Ok(count)
    }

    /// Whether the checkout already sits where `reference` declares.
    ///
    /// This is a deliberately loose, textual policy:
    ///
    /// - Branch: the active branch name contains `reference` and the branch
    ///   is level with its upstream.
    /// - Tag: the status summary (see [`Checkout::status_text`]) mentions
    ///   `reference`.
    /// - Commit: the full `HEAD` id contains `reference`.
    ///
    /// Abbreviated ids and partial names match. False positives, such as a
    /// short id that happens to appear in a changed file's path, are accepted.
    pub fn is_state_ok(&self, reference: &str) -> bool {
        let result = match self.classify_reference(reference) {
            ReferenceKind::Branch => self.branch_up_to_date(reference),
            ReferenceKind::Tag => self.status_text().map(|text| text.contains(reference)),
            ReferenceKind::Commit => self
                .head_id()
                .map(|id| id.to_string().contains(reference)),
            ReferenceKind::Unknown => Ok(false),
        };

        result.unwrap_or_else(|e| {
            tracing::debug!(repo = %self.name(), reference, error = %e, "State check failed");
            false
        })
    }

    fn branch_up_to_date(&self, reference: &str) -> Result<bool> {
        let Some(active) = self.current_branch()? else {
            return Ok(false);
        };
        if !active.contains(reference) {
            return Ok(false);
        }

        let branch = self.repo.find_branch(&active, BranchType::Local)?;
        let Ok(upstream) = branch.upstream() else {
            return Ok(false);
        };

        let local = branch.get().peel_to_commit()?.id();
        let remote = upstream.get().peel_to_commit()?.id();
        let (ahead, behind) = self.repo.graph_ahead_behind(local, remote)?;
        Ok(ahead == 0 && behind == 0)
    }

    /// Summary of the working tree in the spirit of `git status`.
    ///
    /// The first line is `On branch <name>` or `HEAD detached at <what>`,
    /// where `<what>` lists the tags pointing at `HEAD` (or its short id when
    /// there are none). One line per changed or untracked path follows.
    pub fn status_text(&self) -> Result<String> {
        let mut text = String::new();

        match self.current_branch()? {
            Some(branch) => {
                let _ = writeln!(text, "On branch {branch}");
            }
            None => {
                let tags = self.tags_at_head()?;
                let what = if tags.is_empty() {
                    self.short_head_id()?
                } else {
                    tags.join(" ")
                };
                let _ = writeln!(text, "HEAD detached at {what}");
            }
        }

        let mut opts = StatusOptions::new();
        opts.include_untracked(true).include_ignored(false);
        for entry in self.repo.statuses(Some(&mut opts))?.iter() {
            if let Some(path) = entry.path() {
                let _ = writeln!(text, "\t{path}");
            }
        }

        Ok(text)
    }

    /// Names of tags whose target commit is `HEAD`.
    ///
    /// Tags that cannot be looked up, or that point at a tree or blob, are
    /// skipped.
    pub fn tags_at_head(&self) -> Result<Vec<String>> {
        let head = self.head_id()?;
        let mut tags = Vec::new();

        for name in self.repo.tag_names(None)?.iter().flatten() {
            let Ok(reference) = self.repo.find_reference(&format!("refs/tags/{name}")) else {
                tracing::debug!(repo = %self.name(), tag = name, "Skipping unreadable tag");
                continue;
            };
            let Ok(commit) = reference.peel_to_commit() else {
                tracing::debug!(repo = %self.name(), tag = name, "Skipping tag without commit");
                continue;
            };
            if commit.id() == head {
                tags.push(name.to_string());
            }
        }

        Ok(tags)
    }

    /// Whether tracked files or the index hold uncommitted modifications.
    ///
    /// Untracked files do not count.
    pub fn is_dirty(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(statuses
            .iter()
            .any(|entry| entry.status() != git2::Status::CURRENT))
    }
}

impl ReferenceLookup for Checkout {
    fn has_branch(&self, name: &str) -> bool {
        self.repo.find_branch(name, BranchType::Local).is_ok()
    }

    fn has_tag(&self, name: &str) -> bool {
        self.repo
            .find_reference(&format!("refs/tags/{name}"))
            .is_ok()
    }

    fn resolve_commit(&self, spec: &str) -> Option<String> {
        if spec.is_empty() || self.repo.resolve_reference_from_short_name(spec).is_ok() {
            return None;
        }

        self.repo
            .revparse_single(spec)
            .and_then(|object| object.peel_to_commit())
            .map(|commit| commit.id().to_string())
            .ok()
    }
}
