//! Shared fixtures for license engine tests.

#![allow(dead_code)]

use std::sync::OnceLock;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use seatlock_keys::IssuerKey;
use seatlock_license::{HardwareFingerprint, LicenseTerms, LicenseTier};

// RSA keygen is the slow part of this suite; both keys are generated once
// from fixed seeds and shared across tests.
static ISSUER_KEY: OnceLock<IssuerKey> = OnceLock::new();
static ROGUE_KEY: OnceLock<IssuerKey> = OnceLock::new();

/// The keypair every fixture license is signed with.
pub fn issuer_key() -> &'static IssuerKey {
    ISSUER_KEY.get_or_init(|| deterministic_key(0x51_6E_5EA7))
}

/// A second keypair, unrelated to [`issuer_key`].
pub fn rogue_key() -> &'static IssuerKey {
    ROGUE_KEY.get_or_init(|| deterministic_key(0xBAD_C0DE))
}

fn deterministic_key(seed: u64) -> IssuerKey {
    let mut rng = StdRng::seed_from_u64(seed);
    IssuerKey::generate_with_rng(&mut rng).expect("test keygen")
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// The fingerprint the fixture terms are bound to.
pub fn bound_fingerprint() -> HardwareFingerprint {
    HardwareFingerprint::new("ABCD1234EF567890")
}

/// Terms used across the suite unless a test needs something specific.
pub fn sample_terms() -> LicenseTerms {
    LicenseTerms {
        product: "X".to_string(),
        version: "1.0".to_string(),
        tier: LicenseTier::Professional,
        expiry: day(2099, 1, 1),
        max_users: 5,
        customer_name: "Acme Corp".to_string(),
        customer_email: "ops@acme.example".to_string(),
        hardware_id: bound_fingerprint(),
        features: vec!["export".to_string(), "audit".to_string()],
        custom: vec![("region".to_string(), "emea".to_string())],
    }
}
