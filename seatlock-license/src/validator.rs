//! License validation: the untrusted-input side of the engine.

use std::fmt;

use chrono::NaiveDate;
use seatlock_keys::{PublicKeyBlob, ValidatorKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::SignedLicenseDocument;
use crate::error::LicenseResult;
use crate::fingerprint::HardwareFingerprint;
use crate::terms::LicenseTerms;

/// Why validation rejected a document.
///
/// `Malformed` carries no field-level detail: a rejected document gets one
/// uniform answer no matter which part of it broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationFailure {
    /// The bytes do not parse as a license document.
    Malformed,
    /// Structure is fine but the signature does not match the content.
    SignatureMismatch,
    /// Signed and well-formed, but past its expiry day.
    Expired,
    /// Signed and current, but bound to different hardware.
    HardwareMismatch,
}

impl ValidationFailure {
    /// Short human-readable reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "license document is malformed",
            Self::SignatureMismatch => "license signature does not match its content",
            Self::Expired => "license has expired",
            Self::HardwareMismatch => "license is bound to different hardware",
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating license bytes.
///
/// Not a `Result`: an invalid license is a normal answer for this engine,
/// not a failure of the validator itself.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationResult {
    /// Signature, expiry, and hardware binding all check out. Carries the
    /// verified terms; callers read grants from here and nowhere else.
    Valid(LicenseTerms),
    /// Rejected, with the first failure encountered.
    Invalid(ValidationFailure),
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Verified terms, if the license was accepted.
    #[must_use]
    pub fn terms(&self) -> Option<&LicenseTerms> {
        match self {
            Self::Valid(terms) => Some(terms),
            Self::Invalid(_) => None,
        }
    }

    /// Rejection reason, if the license was refused.
    #[must_use]
    pub fn failure(&self) -> Option<ValidationFailure> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(failure) => Some(*failure),
        }
    }
}

/// Checks untrusted license bytes against the vendor public key, the
/// clock, and the local hardware fingerprint.
#[derive(Debug, Clone)]
pub struct LicenseValidator {
    key: ValidatorKey,
}

impl LicenseValidator {
    #[must_use]
    pub fn new(key: ValidatorKey) -> Self {
        Self { key }
    }

    /// Builds a validator straight from an exported public key blob.
    pub fn from_public_blob(blob: &PublicKeyBlob) -> LicenseResult<Self> {
        Ok(Self::new(ValidatorKey::import_public(blob)?))
    }

    /// Validates `bytes` as of `today` on the hardware behind `current`.
    ///
    /// Checks run in a fixed order and stop at the first failure:
    /// structure, signature, expiry, hardware binding. The signature is
    /// verified against the canonical bytes re-derived from the parsed
    /// terms, so expiry and binding are only ever judged on signed content.
    pub fn validate(
        &self,
        bytes: &[u8],
        current: &HardwareFingerprint,
        today: NaiveDate,
    ) -> ValidationResult {
        let document = match SignedLicenseDocument::parse(bytes) {
            Ok(document) => document,
            Err(_) => {
                debug!("rejecting license: malformed document");
                return ValidationResult::Invalid(ValidationFailure::Malformed);
            }
        };
        let canonical = document.canonical_bytes();
        if self.key.verify(&canonical, document.signature()).is_err() {
            debug!("rejecting license: signature mismatch");
            return ValidationResult::Invalid(ValidationFailure::SignatureMismatch);
        }
        let terms = document.into_terms();
        if terms.is_expired(today) {
            debug!(expiry = %terms.expiry, "rejecting license: expired");
            return ValidationResult::Invalid(ValidationFailure::Expired);
        }
        if terms.hardware_id != *current {
            debug!("rejecting license: hardware mismatch");
            return ValidationResult::Invalid(ValidationFailure::HardwareMismatch);
        }
        ValidationResult::Valid(terms)
    }
}
