//! Error types for issuance and validator construction.

use seatlock_keys::KeyError;
use thiserror::Error;

/// Errors from the issuing side and from validator setup.
///
/// Validation outcomes are not errors; see
/// [`ValidationResult`](crate::ValidationResult).
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Terms the canonical document format cannot carry unambiguously.
    #[error("invalid license terms: {0}")]
    InvalidTerms(String),

    /// Underlying key material failure.
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Convenience alias for fallible license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
