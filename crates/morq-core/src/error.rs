//! Error types for morq-core

use std::path::PathBuf;

/// Result type for morq-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in morq-core operations
///
/// Only configuration problems surface through this type during a run;
/// per-repository failures are recorded in the report instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Manifest file not found at the given path
    #[error("No such manifest: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Manifest file parsed but does not have the expected shape
    #[error("Invalid manifest {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    /// Manifest content does not have the expected shape
    #[error("Invalid manifest: {message}")]
    MalformedManifest { message: String },

    /// A repository entry is unusable
    #[error("Invalid entry '{name}' in manifest: {message}")]
    InvalidEntry { name: String, message: String },

    // Transparent wrappers for underlying crate errors
    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
