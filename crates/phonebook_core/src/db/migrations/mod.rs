//! Schema steps for the slot database, tracked in `PRAGMA user_version`.
//!
//! All pending steps run in one transaction.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(version, sql)`; versions strictly increase.
const STEPS: &[(u32, &str)] = &[(1, include_str!("0001_slots.sql"))];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings the database at `location` up to [`latest_version`].
pub(crate) fn apply_migrations(conn: &mut Connection, location: &str) -> DbResult<()> {
    let latest = latest_version();
    let found = conn
        .query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))
        .map_err(|source| DbError::Open {
            location: location.to_string(),
            source,
        })?;

    if found > latest {
        return Err(DbError::SchemaTooNew {
            location: location.to_string(),
            found,
            supported: latest,
        });
    }
    if found == latest {
        return Ok(());
    }

    let failed_at = |version: u32| {
        move |source| DbError::Migration {
            location: location.to_string(),
            version,
            source,
        }
    };
    let tx = conn.transaction().map_err(failed_at(found + 1))?;
    for (version, sql) in STEPS.iter().filter(|(version, _)| *version > found) {
        tx.execute_batch(sql).map_err(failed_at(*version))?;
        tx.pragma_update(None, "user_version", version)
            .map_err(failed_at(*version))?;
    }
    tx.commit().map_err(failed_at(latest))?;

    info!("event=db_migrate module=db status=ok from_version={found} to_version={latest}");
    Ok(())
}
