//! SQLite database holding the `slots` key-value table.
//!
//! Errors name the database they came from (file path or `:memory:`) or the
//! slot key being accessed, so a failing open can be traced to a file.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Location label used for in-memory databases.
pub const MEMORY_LOCATION: &str = ":memory:";

#[derive(Debug)]
pub enum DbError {
    /// Opening the file or configuring the connection failed.
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// Migration to `version` failed and was rolled back.
    Migration {
        location: String,
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was migrated by a newer build.
    SchemaTooNew {
        location: String,
        found: u32,
        supported: u32,
    },
    /// Reading or writing a slot row failed.
    Slot {
        key: &'static str,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open slot database `{location}`: {source}")
            }
            Self::Migration {
                location,
                version,
                source,
            } => write!(
                f,
                "slot database `{location}` failed migration {version}: {source}"
            ),
            Self::SchemaTooNew {
                location,
                found,
                supported,
            } => write!(
                f,
                "slot database `{location}` has schema {found}; this build reads up to {supported}"
            ),
            Self::Slot { key, source } => write!(f, "slot `{key}` access failed: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } | Self::Slot { source, .. } => {
                Some(source)
            }
            Self::SchemaTooNew { .. } => None,
        }
    }
}
