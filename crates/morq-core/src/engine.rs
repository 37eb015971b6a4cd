//! Reconciliation of declared repository state against local checkouts
//!
//! `check` only observes. `update` brings every checkout to its declared
//! reference (clone, pull, checkout) and then observes the same way, so an
//! update run reports the resulting state next to what it changed.
//!
//! Each entry is processed independently; a failing repository yields an
//! `Invalid` row and the run moves on.

use std::path::Path;

use morq_git::{Checkout, ReferenceKind, clone_into};

use crate::manifest::ManifestEntry;
use crate::report::Report;
use crate::status::{CHECK_COLUMNS, Position, Status, StatusRecord, UPDATE_COLUMNS, UpdateTag};
use crate::workspace::Workspace;

/// What an update will do to one entry, decided before any mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePlan {
    /// No checkout yet: clone, then check out the reference
    Clone,
    /// The checkout does not know the reference; leave it untouched
    RejectUnknownReference,
    /// Pull and re-checkout. Tags are reached from the default branch so the
    /// pull has a branch to fast-forward.
    Advance { via_default_branch: bool },
}

/// Decide how to update a checkout towards `reference`.
pub fn plan_update(checkout: Option<&Checkout>, reference: &str) -> UpdatePlan {
    match checkout {
        None => UpdatePlan::Clone,
        Some(checkout) if !checkout.is_known_reference(reference) => {
            UpdatePlan::RejectUnknownReference
        }
        Some(checkout) => UpdatePlan::Advance {
            via_default_branch: checkout.classify_reference(reference) == ReferenceKind::Tag,
        },
    }
}

/// Walks a workspace's manifest and reconciles each entry.
pub struct ReconciliationEngine<'a> {
    workspace: &'a Workspace,
}

impl<'a> ReconciliationEngine<'a> {
    pub fn new(workspace: &'a Workspace) -> Self {
        Self { workspace }
    }

    /// Observe every entry without touching anything.
    pub fn check_all(&self) -> Report<StatusRecord> {
        let mut report = Report::new(&CHECK_COLUMNS);
        for entry in self.workspace.manifest().entries() {
            if let Some(record) = self.check_entry(entry) {
                report.push(record);
            }
        }
        report
    }

    /// Update every entry, then observe it.
    pub fn update_all(&self) -> Report<StatusRecord> {
        let mut report = Report::new(&UPDATE_COLUMNS);
        for entry in self.workspace.manifest().entries() {
            if let Some(record) = self.update_entry(entry) {
                report.push(record);
            }
        }
        report
    }

    /// Observe one entry.
    ///
    /// Returns `None` for a clean checkout that is level with its reference
    /// but does not satisfy the loose state check, such as a branch without
    /// upstream. Such checkouts have nothing to report.
    pub fn check_entry(&self, entry: &ManifestEntry) -> Option<StatusRecord> {
        let folder = self.workspace.folder_path(entry);
        tracing::debug!(repo = %entry.name, path = %folder.display(), "Checking repository");

        let Some(checkout) = Checkout::probe(&folder) else {
            return Some(StatusRecord::new(entry, Position::None, Status::Missing, None));
        };

        if !checkout.is_known_reference(&entry.reference) {
            tracing::warn!(repo = %entry.name, reference = %entry.reference, "Unknown reference");
            return Some(StatusRecord::new(entry, Position::Invalid, Status::Invalid, None));
        }

        classify_state(&checkout, entry, None)
    }

    /// Bring one entry to its declared reference and observe the result.
    pub fn update_entry(&self, entry: &ManifestEntry) -> Option<StatusRecord> {
        let folder = self.workspace.folder_path(entry);
        let checkout = Checkout::probe(&folder);
        let plan = plan_update(checkout.as_ref(), &entry.reference);
        tracing::debug!(repo = %entry.name, ?plan, "Updating repository");

        match (plan, checkout) {
            (UpdatePlan::RejectUnknownReference, _) => {
                tracing::warn!(
                    repo = %entry.name,
                    reference = %entry.reference,
                    "Unknown reference, leaving checkout untouched"
                );
                Some(StatusRecord::new(
                    entry,
                    Position::Invalid,
                    Status::Invalid,
                    Some(UpdateTag::NotApplicable),
                ))
            }
            (UpdatePlan::Advance { via_default_branch }, Some(checkout)) => {
                advance(&checkout, entry, via_default_branch)
            }
            (UpdatePlan::Clone, _) | (UpdatePlan::Advance { .. }, None) => {
                Some(clone_entry(entry, &folder))
            }
        }
    }
}

fn clone_entry(entry: &ManifestEntry, folder: &Path) -> StatusRecord {
    tracing::warn!(repo = %entry.name, path = %folder.display(), "Missing repository, cloning");

    let checkout = match clone_into(&entry.url, folder) {
        Ok(checkout) => checkout,
        Err(e) => {
            tracing::error!(repo = %entry.name, url = %entry.url, error = %e, "Clone failed");
            return StatusRecord::new(
                entry,
                Position::Invalid,
                Status::Invalid,
                Some(UpdateTag::NotApplicable),
            );
        }
    };

    match checkout.checkout_reference(&entry.reference) {
        Ok(()) => StatusRecord::new(
            entry,
            Position::Reference(entry.reference.clone()),
            Status::Ok,
            Some(UpdateTag::New),
        ),
        Err(e) => {
            tracing::error!(
                repo = %entry.name,
                reference = %entry.reference,
                error = %e,
                "Checkout after clone failed"
            );
            StatusRecord::new(entry, Position::Invalid, Status::Invalid, Some(UpdateTag::New))
        }
    }
}

fn advance(
    checkout: &Checkout,
    entry: &ManifestEntry,
    via_default_branch: bool,
) -> Option<StatusRecord> {
    let before = checkout.head_id().ok();

    if via_default_branch {
        match checkout.switch_to_default_branch() {
            Ok(Some(branch)) => {
                tracing::debug!(repo = %entry.name, %branch, "Switched to default branch")
            }
            Ok(None) => tracing::warn!(repo = %entry.name, "Unable to find main or master"),
            Err(e) => {
                tracing::warn!(repo = %entry.name, error = %e, "Failed to switch to default branch")
            }
        }
    }

    let pulled = match checkout.pull() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(repo = %entry.name, error = %e, "Pull failed");
            false
        }
    };

    if let Err(e) = checkout.checkout_reference(&entry.reference) {
        tracing::warn!(
            repo = %entry.name,
            reference = %entry.reference,
            error = %e,
            "Checkout after pull failed"
        );
        return Some(StatusRecord::new(
            entry,
            Position::Reference(entry.reference.clone()),
            Status::Invalid,
            Some(UpdateTag::Invalid),
        ));
    }

    if !pulled {
        // A failed pull always gets a row, even when the state has nothing
        // else to report.
        return classify_state(checkout, entry, Some(UpdateTag::NotApplicable)).or_else(|| {
            let position = checkout
                .short_head_id()
                .map(Position::Commit)
                .unwrap_or(Position::None);
            Some(StatusRecord::new(
                entry,
                position,
                Status::Invalid,
                Some(UpdateTag::NotApplicable),
            ))
        });
    }

    let update = if checkout.head_id().ok() == before {
        UpdateTag::Unchanged
    } else {
        UpdateTag::Changed
    };

    classify_state(checkout, entry, Some(update))
}

/// Observe a checkout whose reference is known: OK, then ahead/behind, then
/// dirty. The first match wins.
fn classify_state(
    checkout: &Checkout,
    entry: &ManifestEntry,
    update: Option<UpdateTag>,
) -> Option<StatusRecord> {
    let reference = &entry.reference;

    if checkout.is_state_ok(reference) {
        return Some(StatusRecord::new(
            entry,
            Position::Reference(reference.clone()),
            Status::Ok,
            update,
        ));
    }

    let delta = checkout.commits_ahead_behind(reference).unwrap_or_else(|e| {
        tracing::warn!(repo = %entry.name, %reference, error = %e, "Failed to count commits");
        0
    });
    if let Some(status) = Status::from_delta(delta) {
        let position = checkout
            .short_head_id()
            .map(Position::Commit)
            .unwrap_or(Position::None);
        return Some(StatusRecord::new(entry, position, status, update));
    }

    match checkout.is_dirty() {
        Ok(true) => Some(StatusRecord::new(
            entry,
            Position::Kind(checkout.classify_reference(reference)),
            Status::Dirty,
            update,
        )),
        Ok(false) => {
            tracing::info!(
                repo = %entry.name,
                %reference,
                "Clean and level with reference but not tracking it, nothing to report"
            );
            None
        }
        Err(e) => {
            tracing::warn!(repo = %entry.name, error = %e, "Failed to read working tree status");
            None
        }
    }
}
