//! FFI use-case API for host-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level drink operations to the host UI via
//!   FRB.
//! - Keep error semantics envelope-based; failures are data, not throws.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The process owns at most one drink store, fixed by the first
//!   successful `open_drink_store` call.
//!
//! # See also
//! - docs/architecture/logging.md

use drinklog_core::contract::drinks_address_table;
use drinklog_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ChangeBus, DrinkColumn, DrinkProvider, DrinkRecord, DrinkStore, DrinkValues, RecordQuery,
};
use log::info;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

const LIST_DEFAULT_LIMIT: u32 = 20;
const LIST_LIMIT_MAX: u32 = 100;
const STORE_NOT_OPEN: &str = "drink store is not open; call open_drink_store first";

static STORE: OnceLock<Mutex<StoreState>> = OnceLock::new();

struct StoreState {
    db_dir: PathBuf,
    provider: DrinkProvider,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One drink row in host-facing form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkItem {
    /// Storage-assigned record id.
    pub record_id: i64,
    /// Free-form drink kind; `None` when the row has no kind.
    pub kind: Option<String>,
    /// Consumed volume in millilitres.
    pub millilitres: i64,
    /// UTC recording timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub recorded_at: String,
}

impl From<DrinkRecord> for DrinkItem {
    fn from(record: DrinkRecord) -> Self {
        Self {
            record_id: record.id,
            kind: record.kind,
            millilitres: record.millilitres,
            recorded_at: record.recorded_at,
        }
    }
}

/// Action response envelope for store open and drink creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Id of the created record, when one was created.
    pub record_id: Option<i64>,
    /// Canonical address of the created record, when one was created.
    pub address: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl DrinkActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            record_id: None,
            address: None,
            message: message.into(),
        }
    }

    fn created(message: impl Into<String>, record_id: i64, address: String) -> Self {
        Self {
            ok: true,
            record_id: Some(record_id),
            address: Some(address),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            address: None,
            message: message.into(),
        }
    }
}

/// List response envelope for drink listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkListResponse {
    /// Newest-first drink rows, at most `applied_limit` of them.
    pub items: Vec<DrinkItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
    /// Effective applied list limit.
    pub applied_limit: u32,
}

/// Read response envelope for a single drink lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkReadResponse {
    /// The matched drink, or `None` when the id is unknown.
    pub item: Option<DrinkItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Mutation response envelope for update and delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkMutationResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Number of rows the operation changed or removed.
    pub affected: u32,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl DrinkMutationResponse {
    fn success(message: impl Into<String>, affected: usize) -> Self {
        Self {
            ok: true,
            affected: u32::try_from(affected).unwrap_or(u32::MAX),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            affected: 0,
            message: message.into(),
        }
    }
}

/// Opens the process-wide drink store under `db_dir`.
///
/// The first successful call fixes the directory for the process; later
/// calls with the same directory are idempotent, later calls with a
/// different directory fail.
///
/// # FFI contract
/// - Sync call; creates the directory, database file and schema on first use.
/// - Never panics; failures come back in the envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn open_drink_store(db_dir: String) -> DrinkActionResponse {
    let db_dir = PathBuf::from(db_dir);

    if let Some(state) = lock_store() {
        if state.db_dir == db_dir {
            return DrinkActionResponse::success("Drink store already open.");
        }
        return DrinkActionResponse::failure(format!(
            "drink store already open at `{}`",
            state.db_dir.display()
        ));
    }

    let mut provider = DrinkProvider::new(
        DrinkStore::on_disk(db_dir.clone()),
        drinks_address_table(),
        ChangeBus::new(),
    );
    if let Err(err) = provider.open() {
        return DrinkActionResponse::failure(format!("open_drink_store failed: {err}"));
    }

    match STORE.set(Mutex::new(StoreState {
        db_dir: db_dir.clone(),
        provider,
    })) {
        Ok(()) => {
            info!("event=store_open module=ffi status=ok");
            DrinkActionResponse::success("Drink store opened.")
        }
        // A racing open won and its store stays authoritative; agreeing
        // on the directory still counts as success.
        Err(_) => match lock_store() {
            Some(state) if state.db_dir == db_dir => {
                DrinkActionResponse::success("Drink store already open.")
            }
            _ => DrinkActionResponse::failure("drink store already open"),
        },
    }
}

/// Logs one drink at the collection address.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `millilitres` must be strictly positive; `kind` is free-form and optional.
/// - Never panics; returns the created record id and address on success.
#[flutter_rust_bridge::frb(sync)]
pub fn log_drink(kind: Option<String>, millilitres: i64) -> DrinkActionResponse {
    let Some(state) = lock_store() else {
        return DrinkActionResponse::failure(STORE_NOT_OPEN);
    };

    let mut values = DrinkValues::new().with_millilitres(millilitres);
    if let Some(kind) = kind {
        values = values.with_kind(kind);
    }

    let collection = state.provider.addresses().collection().clone();
    match state.provider.insert(&collection, &values) {
        Ok(Some(address)) => match address.record_id() {
            Some(record_id) => {
                DrinkActionResponse::created("Drink logged.", record_id, address.to_string())
            }
            None => DrinkActionResponse::failure("log_drink failed: created address has no id"),
        },
        Ok(None) => DrinkActionResponse::failure("log_drink failed: storage rejected the row"),
        Err(err) => DrinkActionResponse::failure(format!("log_drink failed: {err}")),
    }
}

/// Lists drinks newest first.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `limit` is clamped to `1..=100`; `None` and `0` fall back to 20.
/// - Never panics; returns deterministic envelope with applied limit.
#[flutter_rust_bridge::frb(sync)]
pub fn list_drinks(limit: Option<u32>) -> DrinkListResponse {
    let applied_limit = normalize_list_limit(limit);
    let Some(state) = lock_store() else {
        return DrinkListResponse {
            items: Vec::new(),
            message: STORE_NOT_OPEN.to_string(),
            applied_limit,
        };
    };

    let collection = state.provider.addresses().collection().clone();
    let query = RecordQuery {
        projection: None,
        filter: None,
        order: Some(format!(
            "{} DESC, {} DESC",
            DrinkColumn::RecordedAt,
            DrinkColumn::Id
        )),
    };

    let records = state
        .provider
        .query(&collection, &query)
        .map_err(|err| err.to_string())
        .and_then(|set| set.into_records().map_err(|err| err.to_string()));
    match records {
        Ok(records) => {
            let items: Vec<DrinkItem> = records
                .into_iter()
                .take(applied_limit as usize)
                .map(DrinkItem::from)
                .collect();
            let message = if items.is_empty() {
                "No drinks logged yet.".to_string()
            } else {
                format!("Found {} drink(s).", items.len())
            };
            DrinkListResponse {
                items,
                message,
                applied_limit,
            }
        }
        Err(err) => DrinkListResponse {
            items: Vec::new(),
            message: format!("list_drinks failed: {err}"),
            applied_limit,
        },
    }
}

/// Reads one drink by record id.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; an unknown id yields `item: None`, not a failure.
#[flutter_rust_bridge::frb(sync)]
pub fn read_drink(record_id: i64) -> DrinkReadResponse {
    let Some(state) = lock_store() else {
        return DrinkReadResponse {
            item: None,
            message: STORE_NOT_OPEN.to_string(),
        };
    };

    let address = state.provider.addresses().record(record_id);
    let records = state
        .provider
        .query(&address, &RecordQuery::default())
        .map_err(|err| err.to_string())
        .and_then(|set| set.into_records().map_err(|err| err.to_string()));
    match records {
        Ok(records) => match records.into_iter().next() {
            Some(record) => DrinkReadResponse {
                item: Some(DrinkItem::from(record)),
                message: "Drink found.".to_string(),
            },
            None => DrinkReadResponse {
                item: None,
                message: format!("Drink {record_id} not found."),
            },
        },
        Err(err) => DrinkReadResponse {
            item: None,
            message: format!("read_drink failed: {err}"),
        },
    }
}

/// Applies a partial update to one drink.
///
/// Field semantics:
/// - `kind: Some(..)` sets the kind; otherwise `clear_kind: true` writes NULL.
/// - `millilitres: Some(..)` replaces the volume and must be positive.
/// - All-absent input is a no-op reported as `affected: 0`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; an unknown id yields `affected: 0`, not a failure.
#[flutter_rust_bridge::frb(sync)]
pub fn update_drink(
    record_id: i64,
    kind: Option<String>,
    clear_kind: bool,
    millilitres: Option<i64>,
) -> DrinkMutationResponse {
    let Some(state) = lock_store() else {
        return DrinkMutationResponse::failure(STORE_NOT_OPEN);
    };

    let mut values = DrinkValues::new();
    if let Some(kind) = kind {
        values = values.with_kind(kind);
    } else if clear_kind {
        values = values.with_null_kind();
    }
    if let Some(millilitres) = millilitres {
        values = values.with_millilitres(millilitres);
    }

    let address = state.provider.addresses().record(record_id);
    match state.provider.update(&address, &values, None) {
        Ok(affected) => {
            DrinkMutationResponse::success(format!("Updated {affected} drink(s)."), affected)
        }
        Err(err) => DrinkMutationResponse::failure(format!("update_drink failed: {err}")),
    }
}

/// Deletes one drink by record id.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; an unknown id yields `affected: 0`, not a failure.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_drink(record_id: i64) -> DrinkMutationResponse {
    let Some(state) = lock_store() else {
        return DrinkMutationResponse::failure(STORE_NOT_OPEN);
    };

    let address = state.provider.addresses().record(record_id);
    match state.provider.delete(&address, None) {
        Ok(affected) => {
            DrinkMutationResponse::success(format!("Deleted {affected} drink(s)."), affected)
        }
        Err(err) => DrinkMutationResponse::failure(format!("delete_drink failed: {err}")),
    }
}

fn normalize_list_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => LIST_DEFAULT_LIMIT,
        Some(value) if value > LIST_LIMIT_MAX => LIST_LIMIT_MAX,
        Some(value) => value,
        None => LIST_DEFAULT_LIMIT,
    }
}

fn lock_store() -> Option<MutexGuard<'static, StoreState>> {
    STORE.get().map(|state| match state.lock() {
        Ok(guard) => guard,
        // The provider holds no invariants a panicking caller could break
        // mid-call; a poisoned lock is still safe to reuse.
        Err(poisoned) => poisoned.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, delete_drink, init_logging, list_drinks, log_drink, open_drink_store, ping,
        read_drink, update_drink,
    };
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn log_and_read_round_trip() {
        ensure_store();
        let token = unique_token("round-trip");

        let created = log_drink(Some(token.clone()), 250);
        assert!(created.ok, "{}", created.message);
        let record_id = created.record_id.expect("created drink should carry an id");
        let address = created.address.expect("created drink should carry an address");
        assert!(address.contains("/drinks/"));

        let read = read_drink(record_id);
        let item = read.item.expect("created drink should be readable");
        assert_eq!(item.kind.as_deref(), Some(token.as_str()));
        assert_eq!(item.millilitres, 250);
        assert!(!item.recorded_at.is_empty());
    }

    #[test]
    fn log_drink_rejects_non_positive_volume() {
        ensure_store();

        let response = log_drink(Some("water".to_string()), 0);
        assert!(!response.ok);
        assert!(response.message.contains("millilitres"));
    }

    #[test]
    fn list_drinks_normalizes_limit_and_contains_new_row() {
        ensure_store();
        let token = unique_token("list");
        let created = log_drink(Some(token.clone()), 300);
        assert!(created.ok, "{}", created.message);

        let capped = list_drinks(Some(100_000));
        assert_eq!(capped.applied_limit, 100);
        assert!(capped
            .items
            .iter()
            .any(|item| item.kind.as_deref() == Some(token.as_str())));

        let defaulted = list_drinks(None);
        assert_eq!(defaulted.applied_limit, 20);
    }

    #[test]
    fn update_drink_sets_and_clears_fields() {
        ensure_store();
        let token = unique_token("update");
        let created = log_drink(Some(token), 100);
        let record_id = created.record_id.expect("created drink should carry an id");

        let renamed = update_drink(record_id, Some("juice".to_string()), false, Some(330));
        assert!(renamed.ok, "{}", renamed.message);
        assert_eq!(renamed.affected, 1);
        let item = read_drink(record_id).item.expect("row should survive update");
        assert_eq!(item.kind.as_deref(), Some("juice"));
        assert_eq!(item.millilitres, 330);

        let cleared = update_drink(record_id, None, true, None);
        assert_eq!(cleared.affected, 1);
        let item = read_drink(record_id).item.expect("row should survive clear");
        assert_eq!(item.kind, None);

        let rejected = update_drink(record_id, None, false, Some(-10));
        assert!(!rejected.ok);

        let noop = update_drink(record_id, None, false, None);
        assert!(noop.ok, "{}", noop.message);
        assert_eq!(noop.affected, 0);
    }

    #[test]
    fn delete_drink_removes_the_row() {
        ensure_store();
        let created = log_drink(None, 150);
        let record_id = created.record_id.expect("created drink should carry an id");

        let deleted = delete_drink(record_id);
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.affected, 1);
        assert!(read_drink(record_id).item.is_none());

        let again = delete_drink(record_id);
        assert!(again.ok);
        assert_eq!(again.affected, 0);
    }

    fn ensure_store() {
        let response = open_drink_store(shared_db_dir().display().to_string());
        assert!(response.ok, "{}", response.message);
    }

    fn shared_db_dir() -> PathBuf {
        std::env::temp_dir().join(format!("drinklog-ffi-tests-{}", std::process::id()))
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
