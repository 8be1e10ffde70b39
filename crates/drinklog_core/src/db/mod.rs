//! Database bootstrap and lifecycle for the drink store.
//!
//! # Responsibility
//! - Open SQLite connections with the connection-level settings applied.
//! - Keep the on-disk schema current through versioned migrations.
//! - Hold the store lifecycle: configured first, connected after `open`.
//!
//! # Invariants
//! - Every connection handed out has `foreign_keys` on, `busy_timeout`
//!   set and the schema migrated to the latest supported version.
//! - Databases newer than this build are rejected, never downgraded.
//!
//! # See also
//! - `docs/architecture/data-model.md`

pub mod migrations;
mod open;
pub mod store;

pub use open::{open_db, open_db_in_memory};

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DbResult<T> = Result<T, DbError>;

/// Database-level error for open, bootstrap and migration.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Filesystem preparation for an on-disk store failed.
    Io(std::io::Error),
    /// The file on disk was written by a newer build.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::Io(err) => write!(f, "storage io error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "unsupported schema version {db_version}, latest supported is {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(err)
    }
}

impl From<std::io::Error> for DbError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
