//! JSON file backend.
//!
//! # Invariants
//! - The slot lives in one file; a missing file or one that is not UTF-8 is
//!   an absent slot.
//! - Writes land in a sibling temp file that is renamed over the target, so
//!   readers see either the previous or the new snapshot.

use super::{discard_non_text, ContactStorage, StorageResult, CONTACTS_SLOT};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File-backed contacts slot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Uses an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `<dir>/contacts.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{CONTACTS_SLOT}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| CONTACTS_SLOT.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ContactStorage for FileStorage {
    fn read_slot(&self) -> StorageResult<Option<String>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match String::from_utf8(bytes) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) => {
                discard_non_text(self.backend_name(), err.as_bytes().len(), "invalid_utf8");
                Ok(None)
            }
        }
    }

    fn write_slot(&mut self, value: &str) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "json"
    }
}
