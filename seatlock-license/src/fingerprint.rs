//! Hardware fingerprinting for license binding.
//!
//! A fingerprint is SHA-256 over the concatenated raw identifiers of a
//! fixed, ordered list of sources, truncated to the first 8 digest bytes
//! and rendered as 16 uppercase hex characters. Sources that cannot be
//! read contribute nothing: losing a source changes the fingerprint
//! rather than erroring, and a machine with no readable sources still gets
//! a (degenerate) fingerprint.
//!
//! [`FingerprintProvider::host`] reads the real machine. Tests inject
//! their own [`HardwareSource`] list and stay hermetic.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

/// Hex length of a rendered fingerprint.
pub const FINGERPRINT_LEN: usize = 16;

/// One machine identifier the fingerprint can draw from.
pub trait HardwareSource {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Best-effort read of the identifier. `None` when unavailable.
    fn read(&self) -> Option<String>;
}

/// A machine fingerprint, as bound into license terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HardwareFingerprint(String);

impl HardwareFingerprint {
    /// Wraps an existing fingerprint string, typically one parsed back out
    /// of a license document.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HardwareFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes fingerprints from an ordered list of sources.
pub struct FingerprintProvider {
    sources: Vec<Box<dyn HardwareSource>>,
}

impl FingerprintProvider {
    /// Provider over the machine's processor identity and primary disk
    /// serial, in that order.
    #[must_use]
    pub fn host() -> Self {
        Self::new(vec![Box::new(ProcessorIdSource), Box::new(DiskSerialSource)])
    }

    /// Provider over caller-supplied sources. Order matters: the digest
    /// runs over source outputs in list order.
    #[must_use]
    pub fn new(sources: Vec<Box<dyn HardwareSource>>) -> Self {
        Self { sources }
    }

    /// Computes the fingerprint. Unreadable sources are logged and skipped.
    #[must_use]
    pub fn compute(&self) -> HardwareFingerprint {
        let mut hasher = Sha256::new();
        for source in &self.sources {
            match source.read() {
                Some(value) => hasher.update(value.as_bytes()),
                None => warn!(
                    source = source.name(),
                    "hardware source unavailable; fingerprint will not cover it"
                ),
            }
        }
        let digest = hasher.finalize();
        HardwareFingerprint(hex::encode_upper(&digest[..FINGERPRINT_LEN / 2]))
    }
}

impl fmt::Debug for FingerprintProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("FingerprintProvider")
            .field("sources", &names)
            .finish()
    }
}

/// Processor or machine identity. On Linux this is the machine id rather
/// than a per-CPU serial, which modern kernels no longer expose.
pub struct ProcessorIdSource;

impl HardwareSource for ProcessorIdSource {
    fn name(&self) -> &'static str {
        "processor-id"
    }

    fn read(&self) -> Option<String> {
        read_processor_id()
    }
}

/// Serial number of the primary disk.
pub struct DiskSerialSource;

impl HardwareSource for DiskSerialSource {
    fn name(&self) -> &'static str {
        "disk-serial"
    }

    fn read(&self) -> Option<String> {
        read_disk_serial()
    }
}

#[cfg(target_os = "linux")]
fn read_processor_id() -> Option<String> {
    std::fs::read_to_string("/etc/machine-id")
        .or_else(|_| std::fs::read_to_string("/var/lib/dbus/machine-id"))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(target_os = "macos")]
fn read_processor_id() -> Option<String> {
    let output = std::process::Command::new("ioreg")
        .args(["-rd1", "-c", "IOPlatformExpertDevice"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let line = text.lines().find(|line| line.contains("IOPlatformUUID"))?;
    line.split('"').nth(3).map(str::to_string)
}

#[cfg(target_os = "windows")]
fn read_processor_id() -> Option<String> {
    wmic_value(&["cpu", "get", "ProcessorId"])
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn read_processor_id() -> Option<String> {
    None
}

#[cfg(target_os = "linux")]
fn read_disk_serial() -> Option<String> {
    let output = std::process::Command::new("lsblk")
        .args(["-dno", "SERIAL"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(target_os = "macos")]
fn read_disk_serial() -> Option<String> {
    let output = std::process::Command::new("diskutil")
        .args(["info", "/dev/disk0"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let line = text
        .lines()
        .find(|line| line.trim_start().starts_with("Serial Number"))?;
    let value = line.split(':').nth(1)?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(target_os = "windows")]
fn read_disk_serial() -> Option<String> {
    wmic_value(&["diskdrive", "get", "SerialNumber"])
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn read_disk_serial() -> Option<String> {
    None
}

/// Runs `wmic` and returns the first value row, skipping the column header.
#[cfg(target_os = "windows")]
fn wmic_value(args: &[&str]) -> Option<String> {
    let output = std::process::Command::new("wmic").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    text.lines()
        .skip(1)
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
