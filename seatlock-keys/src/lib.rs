//! RSA key material for Seatlock license signing.
//!
//! Licenses are signed with 2048-bit RSA over SHA-256 using deterministic
//! PKCS#1 v1.5 padding. The key surface is split in two: [`IssuerKey`]
//! (private, vendor side) and [`ValidatorKey`] (public, product side). The
//! only bridge between them is [`PublicKeyBlob`], an SPKI PEM export that
//! carries the modulus and public exponent and nothing else, so shipping a
//! blob with the product can never leak signing capability.

mod error;
mod material;

pub use error::{KeyError, KeyResult};
pub use material::{IssuerKey, KEY_BITS, PublicKeyBlob, SIGNATURE_LEN, ValidatorKey};
