//! Drink record model and write-side field mapping.
//!
//! # Responsibility
//! - Define the canonical read model for persisted drink rows.
//! - Provide the typed column set shared by SQL generation and decoding.
//! - Own the field mapping used by insert and update, including its
//!   validation rules.
//!
//! # Invariants
//! - `millilitres` must be strictly positive on insert, and on any update
//!   that carries the field.
//! - Record ids are storage-assigned; `DrinkValues` cannot write them.
//! - The drink kind is free-form text and is never validated.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned row identifier of a drink record.
pub type RecordId = i64;

/// Columns of the drinks table, in contract order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DrinkColumn {
    Id,
    Kind,
    Millilitres,
    RecordedAt,
}

impl DrinkColumn {
    /// Full column set, in the order reads return it by default.
    pub const ALL: [DrinkColumn; 4] = [
        DrinkColumn::Id,
        DrinkColumn::Kind,
        DrinkColumn::Millilitres,
        DrinkColumn::RecordedAt,
    ];

    /// Storage-side column name.
    pub fn as_str(self) -> &'static str {
        match self {
            DrinkColumn::Id => "_id",
            DrinkColumn::Kind => "type",
            DrinkColumn::Millilitres => "millilitres",
            DrinkColumn::RecordedAt => "datetime",
        }
    }
}

impl Display for DrinkColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted drink row.
///
/// `recorded_at` carries the storage timestamp as UTC text in
/// `YYYY-MM-DD HH:MM:SS` form; the engine fills it when the insert did not
/// supply one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub millilitres: i64,
    #[serde(rename = "datetime")]
    pub recorded_at: String,
}

/// Validation failure for a drink field mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrinkValidationError {
    /// Insert without a millilitres field.
    MissingMillilitres,
    /// Millilitres present but not strictly positive.
    NonPositiveMillilitres(i64),
}

impl Display for DrinkValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingMillilitres => write!(f, "drink requires a millilitres value"),
            Self::NonPositiveMillilitres(value) => {
                write!(f, "drink requires millilitres greater than zero, got {value}")
            }
        }
    }
}

impl Error for DrinkValidationError {}

/// Column-to-value mapping for insert and update operations.
///
/// Each column is in one of three states: absent, explicitly NULL, or set
/// to a concrete value. Updates only touch columns the mapping carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrinkValues {
    fields: BTreeMap<DrinkColumn, Value>,
}

impl DrinkValues {
    /// Empty mapping; touches no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the drink kind.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.fields.insert(DrinkColumn::Kind, Value::Text(kind.into()));
        self
    }

    /// Clears the drink kind by writing an explicit NULL.
    pub fn with_null_kind(mut self) -> Self {
        self.fields.insert(DrinkColumn::Kind, Value::Null);
        self
    }

    /// Sets the consumed volume in millilitres.
    pub fn with_millilitres(mut self, millilitres: i64) -> Self {
        self.fields
            .insert(DrinkColumn::Millilitres, Value::Integer(millilitres));
        self
    }

    /// Sets the recording timestamp, overriding the storage default.
    pub fn with_recorded_at(mut self, recorded_at: impl Into<String>) -> Self {
        self.fields
            .insert(DrinkColumn::RecordedAt, Value::Text(recorded_at.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the mapping carries `column`, even as NULL.
    pub fn contains(&self, column: DrinkColumn) -> bool {
        self.fields.contains_key(&column)
    }

    pub fn get(&self, column: DrinkColumn) -> Option<&Value> {
        self.fields.get(&column)
    }

    /// Kind field state: absent, cleared (`Some(None)`), or set.
    pub fn kind(&self) -> Option<Option<&str>> {
        match self.fields.get(&DrinkColumn::Kind) {
            Some(Value::Text(text)) => Some(Some(text.as_str())),
            Some(_) => Some(None),
            None => None,
        }
    }

    pub fn millilitres(&self) -> Option<i64> {
        match self.fields.get(&DrinkColumn::Millilitres) {
            Some(Value::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn recorded_at(&self) -> Option<&str> {
        match self.fields.get(&DrinkColumn::RecordedAt) {
            Some(Value::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Carried columns and their values, in contract column order.
    pub fn entries(&self) -> impl Iterator<Item = (DrinkColumn, &Value)> {
        self.fields.iter().map(|(column, value)| (*column, value))
    }

    /// Checks the rules every new record must satisfy.
    pub fn validate_for_insert(&self) -> Result<(), DrinkValidationError> {
        match self.millilitres() {
            None => Err(DrinkValidationError::MissingMillilitres),
            Some(value) if value <= 0 => Err(DrinkValidationError::NonPositiveMillilitres(value)),
            Some(_) => Ok(()),
        }
    }

    /// Checks the update rules: millilitres may be absent, but when carried
    /// it must be strictly positive.
    pub fn validate_for_update(&self) -> Result<(), DrinkValidationError> {
        if !self.contains(DrinkColumn::Millilitres) {
            return Ok(());
        }
        self.validate_for_insert()
    }
}
