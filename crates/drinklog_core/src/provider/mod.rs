//! Record routing over the drink store.
//!
//! # Responsibility
//! - Resolve collection and record addresses to storage operations.
//! - Enforce field validation before any mutation reaches storage.
//! - Publish records-changed events after successful mutations.
//!
//! # Invariants
//! - Data operations require a completed `open`; `record_type` works on a
//!   closed provider because it only reads the routing table.
//! - A record address always narrows the operation with its own id
//!   predicate, replacing any caller-supplied filter.
//! - At most one notification is published per call, and only when at
//!   least one row actually changed.

use crate::address::{Address, AddressMatch, AddressTable};
use crate::db::store::DrinkStore;
use crate::db::DbError;
use crate::events::{ChangeBus, RecordsChanged};
use crate::model::drink::{DrinkValidationError, DrinkValues};
use crate::repo::drink_repo::{DrinkRepository, Filter, RecordQuery, SqliteDrinkRepository};
use crate::repo::rows::RecordSet;
use crate::repo::RepoError;
use log::error;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Routing-level error covering address resolution, validation and
/// storage.
#[derive(Debug)]
pub enum ProviderError {
    /// A data operation was issued before `open` completed.
    NotOpen,
    /// The address matches neither registered shape for this operation.
    UnsupportedAddress {
        operation: &'static str,
        address: Address,
    },
    /// `record_type` found no registered type for the address.
    UnknownAddressType(Address),
    Validation(DrinkValidationError),
    Storage(RepoError),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOpen => write!(f, "drink store is not open; call open() first"),
            Self::UnsupportedAddress { operation, address } => {
                write!(f, "{operation} is not supported for address {address}")
            }
            Self::UnknownAddressType(address) => {
                write!(f, "no content type registered for address {address}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DrinkValidationError> for ProviderError {
    fn from(err: DrinkValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<RepoError> for ProviderError {
    fn from(err: RepoError) -> Self {
        Self::Storage(err)
    }
}

impl From<DbError> for ProviderError {
    fn from(err: DbError) -> Self {
        Self::Storage(RepoError::Db(err))
    }
}

/// Address-routed access point for drink records.
pub struct DrinkProvider {
    store: DrinkStore,
    addresses: AddressTable,
    changes: ChangeBus,
}

impl DrinkProvider {
    /// Builds a provider over a possibly-closed store.
    ///
    /// Construction is cheap and touches no storage; `open` completes
    /// initialization.
    pub fn new(store: DrinkStore, addresses: AddressTable, changes: ChangeBus) -> Self {
        Self {
            store,
            addresses,
            changes,
        }
    }

    /// Opens the underlying store; idempotent.
    pub fn open(&mut self) -> ProviderResult<()> {
        self.store.open()?;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.store.is_open()
    }

    pub fn store(&self) -> &DrinkStore {
        &self.store
    }

    pub fn addresses(&self) -> &AddressTable {
        &self.addresses
    }

    pub fn changes(&self) -> &ChangeBus {
        &self.changes
    }

    /// Resolves `address` and returns the matching rows.
    ///
    /// On a record address the synthesized id predicate replaces any
    /// filter carried by `query`; projection and order still apply.
    pub fn query(&self, address: &Address, query: &RecordQuery) -> ProviderResult<RecordSet> {
        let repo = SqliteDrinkRepository::new(self.connection()?);
        match self.addresses.match_address(address) {
            Some(AddressMatch::Collection) => Ok(repo.query(query)?),
            Some(AddressMatch::Record(id)) => {
                let narrowed = RecordQuery {
                    projection: query.projection.clone(),
                    filter: Some(Filter::record_id(id)),
                    order: query.order.clone(),
                };
                Ok(repo.query(&narrowed)?)
            }
            None => Err(self.unsupported("query", address)),
        }
    }

    /// Content-type string for the matched address shape.
    ///
    /// Needs no open store; the answer depends only on the routing table.
    pub fn record_type(&self, address: &Address) -> ProviderResult<String> {
        match self.addresses.match_address(address) {
            Some(AddressMatch::Collection) => Ok(self.addresses.list_content_type().to_string()),
            Some(AddressMatch::Record(_)) => Ok(self.addresses.record_content_type().to_string()),
            None => Err(ProviderError::UnknownAddressType(address.clone())),
        }
    }

    /// Inserts one record at the collection address.
    ///
    /// Returns the new record's address. Engine-level rejection of a
    /// validated row is reported as `Ok(None)` and logged, matching the
    /// repository's insert sentinel.
    pub fn insert(
        &self,
        address: &Address,
        values: &DrinkValues,
    ) -> ProviderResult<Option<Address>> {
        let conn = self.connection()?;
        if !matches!(
            self.addresses.match_address(address),
            Some(AddressMatch::Collection)
        ) {
            return Err(self.unsupported("insert", address));
        }
        values.validate_for_insert()?;

        let repo = SqliteDrinkRepository::new(conn);
        let Some(id) = repo.insert(values)? else {
            error!(
                "event=record_insert module=provider status=error \
                 error_code=engine_rejected address={address}"
            );
            return Ok(None);
        };

        self.changes.publish(&RecordsChanged {
            address: address.clone(),
        });
        Ok(Some(address.with_record_id(id)))
    }

    /// Applies a partial update to the rows the address selects.
    ///
    /// An empty mapping is a no-op: it returns 0 without touching storage
    /// or notifying.
    pub fn update(
        &self,
        address: &Address,
        values: &DrinkValues,
        filter: Option<&Filter>,
    ) -> ProviderResult<usize> {
        let conn = self.connection()?;
        let effective = match self.addresses.match_address(address) {
            Some(AddressMatch::Collection) => filter.cloned(),
            Some(AddressMatch::Record(id)) => Some(Filter::record_id(id)),
            None => return Err(self.unsupported("update", address)),
        };
        values.validate_for_update()?;
        if values.is_empty() {
            return Ok(0);
        }

        let repo = SqliteDrinkRepository::new(conn);
        let changed = repo.update(values, effective.as_ref())?;
        if changed > 0 {
            self.changes.publish(&RecordsChanged {
                address: address.clone(),
            });
        }
        Ok(changed)
    }

    /// Deletes the rows the address selects.
    ///
    /// On the collection address a `None` filter removes every record.
    pub fn delete(&self, address: &Address, filter: Option<&Filter>) -> ProviderResult<usize> {
        let conn = self.connection()?;
        let effective = match self.addresses.match_address(address) {
            Some(AddressMatch::Collection) => filter.cloned(),
            Some(AddressMatch::Record(id)) => Some(Filter::record_id(id)),
            None => return Err(self.unsupported("delete", address)),
        };

        let repo = SqliteDrinkRepository::new(conn);
        let removed = repo.delete(effective.as_ref())?;
        if removed > 0 {
            self.changes.publish(&RecordsChanged {
                address: address.clone(),
            });
        }
        Ok(removed)
    }

    fn connection(&self) -> ProviderResult<&Connection> {
        self.store.connection().ok_or(ProviderError::NotOpen)
    }

    fn unsupported(&self, operation: &'static str, address: &Address) -> ProviderError {
        ProviderError::UnsupportedAddress {
            operation,
            address: address.clone(),
        }
    }
}
