//! Published contract between the drink store and its callers.
//!
//! # Responsibility
//! - Pin the stable names shared by storage, routing and host code: the
//!   address authority, the collection path, the table name and the
//!   database file name.
//! - Provide the ready-made routing table for the drink collection.
//!
//! # Invariants
//! - These names are part of the external contract; changing any of them
//!   breaks persisted databases or registered listeners.

use crate::address::AddressTable;

/// Address authority under which drink records are published.
pub const AUTHORITY: &str = "app.drinklog";

/// Path segment addressing the drink collection.
pub const DRINKS_PATH: &str = "drinks";

/// Name of the SQL table holding drink rows.
pub const DRINKS_TABLE: &str = "drinks";

/// Fixed file name of the on-disk database.
pub const DB_FILE_NAME: &str = "drinklog.sqlite3";

/// Routing table for the drink collection under the default authority.
pub fn drinks_address_table() -> AddressTable {
    AddressTable::new(AUTHORITY, DRINKS_PATH).expect("contract authority and path are valid")
}
