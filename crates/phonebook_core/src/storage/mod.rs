//! Persistence capability for the contact list.
//!
//! # Responsibility
//! - Define the one-slot storage contract the store writes through.
//! - Own the snapshot codec (JSON array of `{id, name, number}`).
//! - Provide memory, JSON file and SQLite backends.
//!
//! # Invariants
//! - Exactly one slot, keyed [`CONTACTS_SLOT`], is read or written.
//! - A write replaces the whole snapshot; there are no partial updates.
//! - Undecodable snapshots, including non-text bytes, load as absent. I/O and
//!   database faults are errors.

use crate::config::{PhonebookConfig, StorageBackend};
use crate::db::{open_db, DbError};
use crate::model::contact::Contact;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod file;
mod memory;
mod sqlite;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Key of the single persisted slot.
pub const CONTACTS_SLOT: &str = "contacts";

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-layer failure. Decoding problems are not represented here.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage io error: {err}"),
            Self::Db(err) => write!(f, "storage database error: {err}"),
            Self::Encode(err) => write!(f, "failed to encode contacts snapshot: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// One-slot key-value persistence for the contact sequence.
///
/// Backends implement raw slot access; `load`/`save` layer the snapshot
/// codec on top and should not be overridden.
pub trait ContactStorage {
    /// Reads the raw slot text, `None` when the slot was never written.
    fn read_slot(&self) -> StorageResult<Option<String>>;

    /// Overwrites the raw slot text.
    fn write_slot(&mut self, value: &str) -> StorageResult<()>;

    /// Short backend label for log records.
    fn backend_name(&self) -> &'static str;

    /// Loads the persisted contact sequence.
    ///
    /// Returns `Ok(None)` when the slot is absent or cannot be decoded as an
    /// array of contacts.
    fn load(&self) -> StorageResult<Option<Vec<Contact>>> {
        Ok(self
            .read_slot()?
            .and_then(|raw| decode_snapshot(&raw, self.backend_name())))
    }

    /// Serializes and stores the full contact sequence.
    fn save(&mut self, contacts: &[Contact]) -> StorageResult<()> {
        let raw = serde_json::to_string(contacts).map_err(StorageError::Encode)?;
        self.write_slot(&raw)
    }
}

impl<S: ContactStorage + ?Sized> ContactStorage for Box<S> {
    fn read_slot(&self) -> StorageResult<Option<String>> {
        (**self).read_slot()
    }

    fn write_slot(&mut self, value: &str) -> StorageResult<()> {
        (**self).write_slot(value)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

/// Opens the backend selected by configuration.
///
/// The data directory is created on demand.
pub fn open_storage(config: &PhonebookConfig) -> StorageResult<Box<dyn ContactStorage>> {
    std::fs::create_dir_all(&config.data_dir)?;
    match config.backend {
        StorageBackend::Json => Ok(Box::new(FileStorage::in_dir(&config.data_dir))),
        StorageBackend::Sqlite => {
            let conn = open_db(config.data_dir.join(SqliteStorage::DEFAULT_FILE_NAME))?;
            Ok(Box::new(SqliteStorage::new(conn)))
        }
    }
}

fn decode_snapshot(raw: &str, backend: &'static str) -> Option<Vec<Contact>> {
    match serde_json::from_str::<Vec<Contact>>(raw) {
        Ok(contacts) => Some(contacts),
        Err(err) => {
            // Payload is user data; log position only.
            warn!(
                "event=snapshot_decode module=storage status=discarded backend={} bytes={} line={} column={}",
                backend,
                raw.len(),
                err.line(),
                err.column()
            );
            None
        }
    }
}

/// Logs a slot whose stored form is not text at all; it reads as absent.
fn discard_non_text(backend: &'static str, bytes: usize, reason: &str) {
    warn!(
        "event=snapshot_decode module=storage status=discarded backend={backend} bytes={bytes} reason={reason}"
    );
}

#[cfg(test)]
mod tests {
    use super::{decode_snapshot, ContactStorage, MemoryStorage};
    use crate::model::contact::Contact;

    #[test]
    fn decode_accepts_legacy_short_ids() {
        let raw = r#"[{"id":"S1x9_ab","name":"Rosie Simpson","number":"459-12-56"}]"#;
        let contacts = decode_snapshot(raw, "test").unwrap();
        assert_eq!(contacts[0].id, "S1x9_ab");
    }

    #[test]
    fn decode_rejects_null_object_and_garbage() {
        assert!(decode_snapshot("null", "test").is_none());
        assert!(decode_snapshot(r#"{"contacts":[]}"#, "test").is_none());
        assert!(decode_snapshot("not json", "test").is_none());
        assert!(decode_snapshot(r#"[{"id":1}]"#, "test").is_none());
    }

    #[test]
    fn boxed_storage_delegates_to_inner_backend() {
        let mut storage: Box<dyn ContactStorage> = Box::new(MemoryStorage::new());
        storage
            .save(&[Contact::with_id("id-1", "Eden Clements", "645-17-79")])
            .unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(storage.backend_name(), "memory");
    }
}
