//! Core persistence layer for drink logging.
//! This crate is the single source of truth for record routing invariants.

pub mod address;
pub mod contract;
pub mod db;
pub mod events;
pub mod logging;
pub mod model;
pub mod provider;
pub mod repo;

pub use address::{Address, AddressMatch, AddressParseError, AddressResult, AddressTable};
pub use db::store::{DrinkStore, StoreLocation};
pub use db::{DbError, DbResult};
pub use events::{ChangeBus, ChangeListener, RecordsChanged, SubscriptionId};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::drink::{DrinkColumn, DrinkRecord, DrinkValidationError, DrinkValues, RecordId};
pub use provider::{DrinkProvider, ProviderError, ProviderResult};
pub use repo::drink_repo::{DrinkRepository, Filter, RecordQuery, SqliteDrinkRepository};
pub use repo::rows::{RecordRow, RecordSet};
pub use repo::{RepoError, RepoResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
