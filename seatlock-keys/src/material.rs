//! RSA key material, split by trust role.
//!
//! [`IssuerKey`] holds the private half and lives on the vendor's issuing
//! machine. [`ValidatorKey`] holds only the public half and ships inside the
//! product. The split is enforced by construction: a [`ValidatorKey`] can
//! only be built from a [`PublicKeyBlob`], which never contains private
//! parameters.

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};

use crate::error::{KeyError, KeyResult};

/// RSA modulus size used for all issued licenses.
pub const KEY_BITS: usize = 2048;

/// Length in bytes of a PKCS#1 v1.5 signature under a [`KEY_BITS`] modulus.
pub const SIGNATURE_LEN: usize = KEY_BITS / 8;

/// The private signing key held by the license issuer.
#[derive(Clone)]
pub struct IssuerKey {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl IssuerKey {
    /// Generates a fresh 2048-bit keypair from the OS entropy source.
    pub fn generate() -> KeyResult<Self> {
        Self::generate_with_rng(&mut OsRng)
    }

    /// Generates a keypair from a caller-supplied RNG.
    ///
    /// Production callers want [`IssuerKey::generate`]; this exists so test
    /// suites can derive reproducible keys from a seeded RNG.
    pub fn generate_with_rng<R: CryptoRng + RngCore>(rng: &mut R) -> KeyResult<Self> {
        let private = RsaPrivateKey::new(rng, KEY_BITS)
            .map_err(|e| KeyError::Generation(e.to_string()))?;
        let public = private.to_public_key();
        Ok(Self { private, public })
    }

    /// Signs `message` with SHA-256 and PKCS#1 v1.5 padding.
    ///
    /// The padding is deterministic: signing the same message twice yields
    /// identical bytes, always [`SIGNATURE_LEN`] of them.
    pub fn sign(&self, message: &[u8]) -> KeyResult<Vec<u8>> {
        let signing_key = SigningKey::<Sha256>::new(self.private.clone());
        let signature = signing_key
            .try_sign(message)
            .map_err(|e| KeyError::Signing(e.to_string()))?;
        Ok(signature.to_vec())
    }

    /// Exports the public half as a blob safe to ship with the product.
    pub fn export_public(&self) -> KeyResult<PublicKeyBlob> {
        let pem = self
            .public
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| KeyError::Export(e.to_string()))?;
        Ok(PublicKeyBlob(pem))
    }
}

impl fmt::Debug for IssuerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuerKey")
            .field("private", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// The public verification key embedded in the shipped product.
#[derive(Debug, Clone)]
pub struct ValidatorKey {
    public: RsaPublicKey,
}

impl ValidatorKey {
    /// Builds a validator key from an exported [`PublicKeyBlob`].
    pub fn import_public(blob: &PublicKeyBlob) -> KeyResult<Self> {
        let public = RsaPublicKey::from_public_key_pem(blob.as_pem())
            .map_err(|e| KeyError::Import(e.to_string()))?;
        Ok(Self { public })
    }

    /// Verifies a detached PKCS#1 v1.5 signature over `message`.
    ///
    /// Anything short of an exact match comes back as
    /// [`KeyError::Verification`], with no further detail.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> KeyResult<()> {
        let signature = Signature::try_from(signature).map_err(|_| KeyError::Verification)?;
        let verifying_key = VerifyingKey::<Sha256>::new(self.public.clone());
        verifying_key
            .verify(message, &signature)
            .map_err(|_| KeyError::Verification)
    }
}

/// An exported public key in SPKI PEM form.
///
/// Carries the modulus and public exponent only; a blob can never
/// reconstruct an [`IssuerKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKeyBlob(String);

impl PublicKeyBlob {
    /// Wraps PEM text, typically read back from a product build.
    #[must_use]
    pub fn from_pem(pem: impl Into<String>) -> Self {
        Self(pem.into())
    }

    #[must_use]
    pub fn as_pem(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicKeyBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
