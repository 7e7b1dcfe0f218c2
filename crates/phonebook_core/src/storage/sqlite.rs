//! SQLite key-value backend.
//!
//! # Invariants
//! - The connection handed to [`SqliteStorage::new`] has migrations applied
//!   (use `db::open_db`/`db::open_db_in_memory`).
//! - Writes upsert the single `contacts` row of the `slots` table.
//! - A row whose value is not UTF-8 TEXT reads as an absent slot.

use super::{discard_non_text, ContactStorage, StorageResult, CONTACTS_SLOT};
use crate::db::DbError;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};

/// `slots` table backed contacts slot.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub const DEFAULT_FILE_NAME: &'static str = "phonebook.sqlite3";

    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Removes the slot, as an external "clear storage" would.
    pub fn clear(&mut self) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM slots WHERE key = ?1;", [CONTACTS_SLOT])
            .map_err(slot_error)?;
        Ok(())
    }
}

fn slot_error(source: rusqlite::Error) -> DbError {
    DbError::Slot {
        key: CONTACTS_SLOT,
        source,
    }
}

impl ContactStorage for SqliteStorage {
    fn read_slot(&self) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1;",
                [CONTACTS_SLOT],
                |row| {
                    Ok(match row.get_ref(0)? {
                        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                            .map(str::to_owned)
                            .map_err(|_| ("invalid_utf8", bytes.len())),
                        ValueRef::Blob(bytes) => Err(("blob_value", bytes.len())),
                        _ => Err(("non_text_value", 0)),
                    })
                },
            )
            .optional()
            .map_err(slot_error)?;

        match value {
            None => Ok(None),
            Some(Ok(raw)) => Ok(Some(raw)),
            Some(Err((reason, bytes))) => {
                discard_non_text(self.backend_name(), bytes, reason);
                Ok(None)
            }
        }
    }

    fn write_slot(&mut self, value: &str) -> StorageResult<()> {
        self.conn
            .execute(
                "INSERT INTO slots (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![CONTACTS_SLOT, value],
            )
            .map_err(slot_error)?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
