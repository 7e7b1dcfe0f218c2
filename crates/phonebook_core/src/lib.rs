//! Core domain logic for the phonebook.
//! This crate is the single source of truth for contact invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;

pub use config::{ConfigError, PhonebookConfig, StorageBackend};
pub use logging::{default_log_level, init_logging, logging_status, normalize_level};
pub use model::contact::{Contact, ContactId};
pub use model::notice::Notice;
pub use storage::{
    open_storage, ContactStorage, FileStorage, MemoryStorage, SqliteStorage, StorageError,
    StorageResult, CONTACTS_SLOT,
};
pub use store::notifier::{Notifier, RecordingNotifier};
pub use store::phonebook::{Phonebook, PhonebookError, PhonebookResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
