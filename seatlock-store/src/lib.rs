//! Named storage for serialized license documents.
//!
//! The store holds opaque bytes: nothing here parses or verifies a
//! document, so a stored license round-trips exactly and rejection stays
//! the validator's job. [`FsLicenseStore`] is the production backend, one
//! `.lic` file per name under a root directory; [`MemLicenseStore`] backs
//! tests and ephemeral setups.

mod error;

pub use error::{StoreError, StoreResult};

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

/// File extension for stored documents.
const LICENSE_EXT: &str = "lic";

/// Byte-level storage for license documents, keyed by name.
///
/// Backends may reject names they cannot represent as
/// [`StoreError::InvalidName`].
pub trait LicenseStore {
    /// Persists `bytes` under `name`, replacing any previous content.
    fn save(&self, name: &str, bytes: &[u8]) -> StoreResult<()>;

    /// Loads the bytes stored under `name`.
    fn load(&self, name: &str) -> StoreResult<Vec<u8>>;
}

/// Filesystem-backed store: `<root>/<name>.lic`.
#[derive(Debug, Clone)]
pub struct FsLicenseStore {
    root: PathBuf,
}

impl FsLicenseStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory this store reads and writes.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names map to flat files under the root; path separators would
    /// escape it.
    fn entry_path(&self, name: &str) -> StoreResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(format!("{name}.{LICENSE_EXT}")))
    }
}

impl LicenseStore for FsLicenseStore {
    fn save(&self, name: &str, bytes: &[u8]) -> StoreResult<()> {
        let path = self.entry_path(name)?;
        fs::create_dir_all(&self.root)?;
        fs::write(&path, bytes)?;
        debug!(name, len = bytes.len(), "saved license document");
        Ok(())
    }

    fn load(&self, name: &str) -> StoreResult<Vec<u8>> {
        let path = self.entry_path(name)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemLicenseStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemLicenseStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LicenseStore for MemLicenseStore {
    fn save(&self, name: &str, bytes: &[u8]) -> StoreResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn load(&self, name: &str) -> StoreResult<Vec<u8>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
