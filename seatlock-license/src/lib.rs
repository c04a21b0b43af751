//! License issuance and validation for Seatlock.
//!
//! The engine has two halves that never share secrets:
//!
//! - the **issuer** (vendor side) holds the RSA private key, canonicalizes
//!   [`LicenseTerms`] into a line-oriented text document, and embeds a
//!   PKCS#1 v1.5 signature as the document's final line;
//! - the **validator** (product side) holds only the public key, re-derives
//!   the canonical bytes from a parsed document, and checks signature,
//!   expiry, and hardware binding in that order, failing closed on the
//!   first mismatch.
//!
//! ```no_run
//! use chrono::Utc;
//! use seatlock_keys::IssuerKey;
//! use seatlock_license::{
//!     FingerprintProvider, LicenseIssuer, LicenseTerms, LicenseTier, LicenseValidator,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let issuer = LicenseIssuer::new(IssuerKey::generate()?);
//! let public = issuer.export_public()?;
//!
//! let terms = LicenseTerms {
//!     product: "Widget Pro".into(),
//!     version: "2.1".into(),
//!     tier: LicenseTier::Professional,
//!     expiry: "2099-01-01".parse()?,
//!     max_users: 5,
//!     customer_name: "Acme Corp".into(),
//!     customer_email: "ops@acme.example".into(),
//!     hardware_id: FingerprintProvider::host().compute(),
//!     features: vec!["export".into()],
//!     custom: vec![],
//! };
//! let document = issuer.issue(&terms)?;
//!
//! let validator = LicenseValidator::from_public_blob(&public)?;
//! let result = validator.validate(
//!     &document.to_bytes(),
//!     &FingerprintProvider::host().compute(),
//!     Utc::now().date_naive(),
//! );
//! assert!(result.is_valid());
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
mod fingerprint;
mod issuer;
mod terms;
mod validator;

pub use document::{DocumentParseError, SignedLicenseDocument};
pub use error::{LicenseError, LicenseResult};
pub use fingerprint::{
    DiskSerialSource, FINGERPRINT_LEN, FingerprintProvider, HardwareFingerprint, HardwareSource,
    ProcessorIdSource,
};
pub use issuer::LicenseIssuer;
pub use terms::{LicenseTerms, LicenseTier, UnknownTier};
pub use validator::{LicenseValidator, ValidationFailure, ValidationResult};
