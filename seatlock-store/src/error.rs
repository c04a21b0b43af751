//! Storage error types.

use thiserror::Error;

/// Errors from license document storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document stored under the requested name.
    #[error("no license stored under `{0}`")]
    NotFound(String),

    /// The name cannot be used by this backend.
    #[error("invalid license name `{0}`")]
    InvalidName(String),

    /// Underlying filesystem failure.
    #[error("license storage io: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
