//! Versioned schema migrations.
//!
//! # Responsibility
//! - Track the schema version through `PRAGMA user_version`.
//! - Apply pending migration scripts in order, each in its own
//!   transaction.
//!
//! # Invariants
//! - Migrations only move forward; a database stamped newer than this
//!   build is rejected untouched.
//! - A failed script rolls back and leaves the version stamp unchanged.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Ordered migration scripts; the script at index `n` produces version
/// `n + 1`.
const MIGRATIONS: [&str; 1] = [include_str!("0001_init.sql")];

/// Newest schema version this build understands.
pub fn latest_version() -> u32 {
    MIGRATIONS.len() as u32
}

/// Schema version stamped into the open database.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}

/// Brings the schema up to [`latest_version`].
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = current_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    for version in current..latest {
        let script = MIGRATIONS[version as usize];
        let tx = conn.transaction()?;
        tx.execute_batch(script)?;
        tx.pragma_update(None, "user_version", version + 1)?;
        tx.commit()?;
        info!(
            "event=db_migrate module=db status=ok from_version={version} to_version={}",
            version + 1
        );
    }
    Ok(())
}
