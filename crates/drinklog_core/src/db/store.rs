//! Two-phase lifecycle holder for the drink database.
//!
//! # Responsibility
//! - Carry the storage location from construction until the first `open`.
//! - Own the live connection and lend it to data operations.
//!
//! # Invariants
//! - A store starts closed; `open` must succeed before `connection`
//!   yields anything.
//! - `open` is idempotent: opening an already-open store changes nothing.
//! - On-disk stores always use the fixed [`contract::DB_FILE_NAME`]
//!   inside their directory.

use super::{open_db, open_db_in_memory, DbResult};
use crate::contract;
use log::info;
use rusqlite::Connection;
use std::path::PathBuf;

/// Placement of the backing database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Durable database file inside the given directory.
    OnDisk(PathBuf),
    /// Private in-memory database, discarded when the store closes.
    InMemory,
}

/// Lifecycle holder around the drink database connection.
#[derive(Debug)]
pub struct DrinkStore {
    location: StoreLocation,
    conn: Option<Connection>,
}

impl DrinkStore {
    /// Configured but closed store; no file or connection is touched yet.
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            conn: None,
        }
    }

    /// Closed store backed by `{directory}/drinklog.sqlite3`.
    pub fn on_disk(directory: impl Into<PathBuf>) -> Self {
        Self::new(StoreLocation::OnDisk(directory.into()))
    }

    /// Closed store backed by a fresh in-memory database.
    pub fn in_memory() -> Self {
        Self::new(StoreLocation::InMemory)
    }

    /// Opens the database, creating the directory, the file and the
    /// schema as needed. A second call on an open store is a no-op.
    pub fn open(&mut self) -> DbResult<()> {
        if self.conn.is_some() {
            return Ok(());
        }
        let conn = match &self.location {
            StoreLocation::OnDisk(directory) => {
                std::fs::create_dir_all(directory)?;
                open_db(directory.join(contract::DB_FILE_NAME))?
            }
            StoreLocation::InMemory => open_db_in_memory()?,
        };
        info!(
            "event=store_open module=db status=ok location={}",
            self.location_label()
        );
        self.conn = Some(conn);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Live connection, or `None` while the store is closed.
    pub fn connection(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }

    /// Path of the backing file; `None` for in-memory stores.
    pub fn database_path(&self) -> Option<PathBuf> {
        match &self.location {
            StoreLocation::OnDisk(directory) => Some(directory.join(contract::DB_FILE_NAME)),
            StoreLocation::InMemory => None,
        }
    }

    /// Drops the live connection. The store can be reopened later;
    /// in-memory stores come back empty.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            info!(
                "event=store_close module=db status=ok location={}",
                self.location_label()
            );
        }
    }

    fn location_label(&self) -> String {
        match &self.location {
            StoreLocation::OnDisk(directory) => format!("file:{}", directory.display()),
            StoreLocation::InMemory => "memory".to_string(),
        }
    }
}
