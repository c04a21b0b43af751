//! License issuance: canonicalize terms, sign, bind the signature.

use seatlock_keys::{IssuerKey, PublicKeyBlob};
use tracing::info;

use crate::document::{SignedLicenseDocument, canonical_terms_bytes};
use crate::error::{LicenseError, LicenseResult};
use crate::terms::LicenseTerms;

/// Signs license terms on the vendor side.
///
/// Issuing is pure: the same terms under the same key produce the same
/// document bytes, so issued artifacts are reproducible and diffable.
#[derive(Debug)]
pub struct LicenseIssuer {
    key: IssuerKey,
}

impl LicenseIssuer {
    #[must_use]
    pub fn new(key: IssuerKey) -> Self {
        Self { key }
    }

    /// Exports the public half for embedding in the product build.
    pub fn export_public(&self) -> LicenseResult<PublicKeyBlob> {
        Ok(self.key.export_public()?)
    }

    /// Issues a signed license over `terms`.
    ///
    /// Rejects terms the canonical format cannot carry unambiguously:
    /// empty feature names and empty custom attribute keys.
    pub fn issue(&self, terms: &LicenseTerms) -> LicenseResult<SignedLicenseDocument> {
        if terms.features.iter().any(String::is_empty) {
            return Err(LicenseError::InvalidTerms(
                "feature names must be non-empty".into(),
            ));
        }
        if terms.custom.iter().any(|(key, _)| key.is_empty()) {
            return Err(LicenseError::InvalidTerms(
                "custom attribute keys must be non-empty".into(),
            ));
        }
        let canonical = canonical_terms_bytes(terms);
        let signature = self.key.sign(&canonical)?;
        info!(
            product = %terms.product,
            tier = %terms.tier,
            expiry = %terms.expiry,
            "issued license"
        );
        Ok(SignedLicenseDocument::new(terms.clone(), signature))
    }
}
