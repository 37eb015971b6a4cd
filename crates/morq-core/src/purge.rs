//! Removal of every declared checkout

use std::fmt;
use std::io;
use std::path::Path;

use serde::{Serialize, Serializer};

use crate::report::{Report, Tabular};
use crate::workspace::Workspace;

pub const PURGE_COLUMNS: [&str; 2] = ["folder", "purge"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeOutcome {
    Removed,
    Missing,
    Failed,
}

impl fmt::Display for PurgeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PurgeOutcome::Removed => "Removed",
            PurgeOutcome::Missing => "Missing",
            PurgeOutcome::Failed => "Failed",
        })
    }
}

impl Serialize for PurgeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeRecord {
    pub folder: String,
    pub outcome: PurgeOutcome,
}

impl Tabular for PurgeRecord {
    fn cells(&self) -> Vec<String> {
        vec![self.folder.clone(), self.outcome.to_string()]
    }
}

/// Recursively delete every entry's folder. No confirmation is asked.
///
/// Folders that are already gone, or vanish while being deleted, are not
/// failures. Any other I/O error is recorded and counted.
pub fn purge_all(workspace: &Workspace) -> Report<PurgeRecord> {
    let mut report = Report::new(&PURGE_COLUMNS);

    for entry in workspace.manifest().entries() {
        let folder = workspace.folder_path(entry);
        let outcome = match remove_tree(&folder) {
            Ok(true) => {
                tracing::info!(repo = %entry.name, path = %folder.display(), "Removed checkout");
                PurgeOutcome::Removed
            }
            Ok(false) => {
                tracing::warn!(repo = %entry.name, path = %folder.display(), "Folder does not exist");
                PurgeOutcome::Missing
            }
            Err(e) => {
                tracing::error!(repo = %entry.name, path = %folder.display(), error = %e, "Failed to remove checkout");
                report.add_failures(1);
                PurgeOutcome::Failed
            }
        };

        report.push(PurgeRecord {
            folder: entry.name.clone(),
            outcome,
        });
    }

    report
}

/// Remove `path` and everything below it. `Ok(false)` when it was absent.
fn remove_tree(path: &Path) -> io::Result<bool> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Path vanished during removal");
            Ok(true)
        }
        Err(e) => Err(e),
    }
}
