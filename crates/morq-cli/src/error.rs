//! Error types for morq-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end a CLI run
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from morq-core
    #[error(transparent)]
    Core(#[from] morq_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failed to serialize records
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Follow-up advice printed under the error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::Core(morq_core::Error::ManifestNotFound { .. }) => {
                Some("Use -m/--manifest-file to point at the manifest")
            }
            _ => None,
        }
    }
}
