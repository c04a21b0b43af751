//! Error types for key generation, exchange, and signature checks.

use thiserror::Error;

/// Errors from key material operations.
#[derive(Debug, Error)]
pub enum KeyError {
    /// RSA keypair generation failed.
    #[error("key generation failed: {0}")]
    Generation(String),

    /// The public half could not be serialized to PEM.
    #[error("public key export failed: {0}")]
    Export(String),

    /// The supplied blob is not a valid SPKI public key.
    #[error("public key import failed: {0}")]
    Import(String),

    /// Signing failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The signature does not match the message under this key.
    #[error("signature verification failed")]
    Verification,
}

/// Convenience alias for key material operations.
pub type KeyResult<T> = Result<T, KeyError>;
