//! License terms: what a license grants, to whom, and until when.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fingerprint::HardwareFingerprint;

/// Capability level granted by a license.
///
/// Wire names are exactly the variant names; anything else fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseTier {
    Trial,
    Standard,
    Professional,
    Enterprise,
}

impl LicenseTier {
    /// Canonical wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trial => "Trial",
            Self::Standard => "Standard",
            Self::Professional => "Professional",
            Self::Enterprise => "Enterprise",
        }
    }
}

impl fmt::Display for LicenseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a tier name outside the four known spellings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown license tier `{0}`")]
pub struct UnknownTier(String);

impl FromStr for LicenseTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Trial" => Ok(Self::Trial),
            "Standard" => Ok(Self::Standard),
            "Professional" => Ok(Self::Professional),
            "Enterprise" => Ok(Self::Enterprise),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}

/// The full set of terms a license grants.
///
/// Field order mirrors the canonical document layout. `features` and
/// `custom` are ordered: reordering either produces a different document
/// and therefore a different signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseTerms {
    pub product: String,
    pub version: String,
    pub tier: LicenseTier,
    /// Last day the license is good for. The expiry day itself is licensed.
    pub expiry: NaiveDate,
    pub max_users: u32,
    pub customer_name: String,
    pub customer_email: String,
    /// Fingerprint of the machine the license is bound to.
    pub hardware_id: HardwareFingerprint,
    pub features: Vec<String>,
    /// Issuer-defined key/value pairs, kept in issuance order. Duplicate
    /// keys are allowed and preserved.
    pub custom: Vec<(String, String)>,
}

impl LicenseTerms {
    /// True once `today` has moved past the expiry day.
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        today > self.expiry
    }
}
