//! Error types for morq-git

use std::path::PathBuf;

/// Result type for morq-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in morq-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Failed to clone {url} into {path}: {message}")]
    CloneFailed {
        url: String,
        path: PathBuf,
        message: String,
    },

    #[error("Reference '{name}' not found")]
    ReferenceNotFound { name: String },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Pull failed: {message}")]
    PullFailed { message: String },

    #[error("Cannot fast-forward: {message}")]
    CannotFastForward { message: String },
}
