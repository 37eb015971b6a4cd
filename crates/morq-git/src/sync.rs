//! Mutating operations that move a checkout toward a declared reference
//!
//! Every working-tree update uses a safe checkout strategy: files with local
//! modifications that would be overwritten make the operation fail instead of
//! being replaced.

use std::path::Path;

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{AutotagOption, BranchType, Cred, CredentialType, FetchOptions, RemoteCallbacks};

use crate::checkout::Checkout;
use crate::reference::ReferenceLookup;
use crate::{Error, Result};

/// Remote every checkout is cloned from and pulled against.
pub const ORIGIN: &str = "origin";

/// Branches tried, in order, when a tag checkout has to be moved onto a
/// branch before pulling.
pub const DEFAULT_BRANCHES: [&str; 2] = ["main", "master"];

/// Credential attempts before giving up on a remote.
const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// Callbacks that only use credentials configured outside of morq:
/// the ssh agent, git credential helpers, or platform defaults.
fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut attempts = 0;
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username, allowed| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("no usable credentials configured"));
        }

        if allowed.contains(CredentialType::SSH_KEY)
            && let Some(user) = username
        {
            return Cred::ssh_key_from_agent(user);
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            let config = git2::Config::open_default()?;
            return Cred::credential_helper(&config, url, username);
        }
        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(username.unwrap_or("git"));
        }
        Cred::default()
    });
    callbacks
}

fn fetch_options<'a>() -> FetchOptions<'a> {
    let mut opts = FetchOptions::new();
    opts.remote_callbacks(remote_callbacks());
    opts.download_tags(AutotagOption::All);
    opts
}

fn safe_checkout() -> CheckoutBuilder<'static> {
    let mut opts = CheckoutBuilder::new();
    opts.safe();
    opts
}

/// Clone `url` into `path` and open the result.
pub fn clone_into(url: &str, path: &Path) -> Result<Checkout> {
    tracing::info!(url, path = %path.display(), "Cloning repository");

    let repo = RepoBuilder::new()
        .fetch_options(fetch_options())
        .clone(url, path)
        .map_err(|e| Error::CloneFailed {
            url: url.to_string(),
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;

    Ok(Checkout::from_repository(repo, path))
}

impl Checkout {
    /// Check out `reference` the way `git checkout <reference>` would.
    ///
    /// - A local branch is checked out and `HEAD` attached to it.
    /// - A branch that only exists on `origin` gets a local tracking branch.
    /// - Anything else that resolves to a commit (tags, ids) detaches `HEAD`.
    ///
    /// The working tree is updated before `HEAD` moves, so a refused checkout
    /// leaves the repository where it was.
    pub fn checkout_reference(&self, reference: &str) -> Result<()> {
        let repo = self.repo();

        if let Ok(branch) = repo.find_branch(reference, BranchType::Local) {
            let refname = branch
                .get()
                .name()
                .ok_or_else(|| Error::ReferenceNotFound {
                    name: reference.to_string(),
                })?
                .to_string();
            let commit = branch.get().peel_to_commit()?;
            repo.checkout_tree(commit.as_object(), Some(&mut safe_checkout()))?;
            repo.set_head(&refname)?;
            tracing::debug!(repo = %self.name(), branch = reference, "Checked out branch");
            return Ok(());
        }

        let tracking = format!("{ORIGIN}/{reference}");
        if let Ok(remote_branch) = repo.find_branch(&tracking, BranchType::Remote) {
            let commit = remote_branch.get().peel_to_commit()?;
            repo.checkout_tree(commit.as_object(), Some(&mut safe_checkout()))?;
            let mut local = repo.branch(reference, &commit, false)?;
            local.set_upstream(Some(&tracking))?;
            repo.set_head(&format!("refs/heads/{reference}"))?;
            tracing::debug!(
                repo = %self.name(),
                branch = reference,
                upstream = %tracking,
                "Created tracking branch"
            );
            return Ok(());
        }

        let commit = repo
            .revparse_single(reference)
            .and_then(|object| object.peel_to_commit())
            .map_err(|_| Error::ReferenceNotFound {
                name: reference.to_string(),
            })?;
        repo.checkout_tree(commit.as_object(), Some(&mut safe_checkout()))?;
        repo.set_head_detached(commit.id())?;
        tracing::debug!(repo = %self.name(), reference, commit = %commit.id(), "Detached HEAD");
        Ok(())
    }

    /// Move onto the repository's default branch.
    ///
    /// Tries each of [`DEFAULT_BRANCHES`] locally and on `origin`. Returns the
    /// branch switched to, or `None` when neither exists.
    pub fn switch_to_default_branch(&self) -> Result<Option<String>> {
        for name in DEFAULT_BRANCHES {
            let exists = self.has_branch(name)
                || self
                    .repo()
                    .find_branch(&format!("{ORIGIN}/{name}"), BranchType::Remote)
                    .is_ok();
            if exists {
                self.checkout_reference(name)?;
                return Ok(Some(name.to_string()));
            }
        }
        Ok(None)
    }

    /// Fetch from `origin` and fast-forward the active branch to its upstream.
    ///
    /// With a detached `HEAD` or a branch without upstream only the fetch
    /// happens. Diverged history is an error; nothing is merged or rebased.
    pub fn pull(&self) -> Result<()> {
        let repo = self.repo();

        let mut remote = repo.find_remote(ORIGIN).map_err(|_| Error::RemoteNotFound {
            name: ORIGIN.to_string(),
        })?;

        let refspecs: &[&str] = &[];
        remote
            .fetch(refspecs, Some(&mut fetch_options()), None)
            .map_err(|e| Error::PullFailed {
                message: format!("Fetch failed: {}", e.message()),
            })?;

        let Some(branch_name) = self.current_branch()? else {
            tracing::debug!(repo = %self.name(), "Detached HEAD, fetched only");
            return Ok(());
        };

        let branch = repo.find_branch(&branch_name, BranchType::Local)?;
        let upstream = match branch.upstream() {
            Ok(upstream) => upstream,
            Err(_) => {
                tracing::debug!(repo = %self.name(), branch = %branch_name, "No upstream, fetched only");
                return Ok(());
            }
        };

        let upstream_commit = upstream.get().peel_to_commit()?;
        let head_commit = branch.get().peel_to_commit()?;

        let (merge_analysis, _) =
            repo.merge_analysis(&[&repo.find_annotated_commit(upstream_commit.id())?])?;

        if merge_analysis.is_up_to_date() {
            return Ok(());
        }

        if merge_analysis.is_fast_forward() {
            repo.checkout_tree(upstream_commit.as_object(), Some(&mut safe_checkout()))?;
            let mut reference = branch.into_reference();
            reference.set_target(
                upstream_commit.id(),
                &format!("pull: fast-forward to {}", upstream_commit.id()),
            )?;
            tracing::debug!(
                repo = %self.name(),
                branch = %branch_name,
                from = %head_commit.id(),
                to = %upstream_commit.id(),
                "Fast-forwarded"
            );
            return Ok(());
        }

        Err(Error::CannotFastForward {
            message: format!(
                "Cannot fast-forward {} from {} to {}. Manual merge required.",
                branch_name,
                head_commit.id(),
                upstream_commit.id()
            ),
        })
    }
}
