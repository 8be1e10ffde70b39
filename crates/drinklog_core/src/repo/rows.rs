//! Projection-aware result sets for record queries.
//!
//! # Responsibility
//! - Carry matched rows together with the column list they were read
//!   under.
//! - Decode full-projection rows into [`DrinkRecord`] values.
//!
//! # Invariants
//! - Every row holds exactly one value per projected column.
//! - Decoding rejects missing columns and type mismatches instead of
//!   masking them.

use crate::model::drink::{DrinkColumn, DrinkRecord, RecordId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;

/// Matched rows of one query, materialized in result order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    columns: Vec<DrinkColumn>,
    rows: Vec<Vec<Value>>,
}

impl RecordSet {
    pub(crate) fn new(columns: Vec<DrinkColumn>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Columns each row was read under, in projection order.
    pub fn columns(&self) -> &[DrinkColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates the matched rows without copying them.
    pub fn rows(&self) -> impl Iterator<Item = RecordRow<'_>> {
        self.rows.iter().map(|values| RecordRow {
            columns: &self.columns,
            values,
        })
    }

    pub fn row(&self, index: usize) -> Option<RecordRow<'_>> {
        self.rows.get(index).map(|values| RecordRow {
            columns: &self.columns,
            values,
        })
    }

    /// Decodes every row into a full record.
    ///
    /// Requires the full column set in the projection; partial reads
    /// cannot produce records.
    pub fn into_records(self) -> RepoResult<Vec<DrinkRecord>> {
        let mut records = Vec::with_capacity(self.rows.len());
        for row in self.rows() {
            records.push(row.to_record()?);
        }
        Ok(records)
    }
}

/// Borrowed view over one matched row.
#[derive(Debug, Clone, Copy)]
pub struct RecordRow<'a> {
    columns: &'a [DrinkColumn],
    values: &'a [Value],
}

impl<'a> RecordRow<'a> {
    /// Value for `column`, when the projection included it.
    pub fn value(&self, column: DrinkColumn) -> Option<&'a Value> {
        let index = self.columns.iter().position(|&c| c == column)?;
        self.values.get(index)
    }

    pub fn id(&self) -> Option<RecordId> {
        match self.value(DrinkColumn::Id)? {
            Value::Integer(id) => Some(*id),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<&'a str> {
        match self.value(DrinkColumn::Kind)? {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn millilitres(&self) -> Option<i64> {
        match self.value(DrinkColumn::Millilitres)? {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn recorded_at(&self) -> Option<&'a str> {
        match self.value(DrinkColumn::RecordedAt)? {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Decodes the row into a full record.
    pub fn to_record(&self) -> RepoResult<DrinkRecord> {
        let id = match self.value(DrinkColumn::Id) {
            Some(Value::Integer(id)) => *id,
            Some(other) => return Err(decode_error(DrinkColumn::Id, other)),
            None => return Err(missing_column(DrinkColumn::Id)),
        };
        let kind = match self.value(DrinkColumn::Kind) {
            Some(Value::Text(text)) => Some(text.clone()),
            Some(Value::Null) => None,
            Some(other) => return Err(decode_error(DrinkColumn::Kind, other)),
            None => return Err(missing_column(DrinkColumn::Kind)),
        };
        let millilitres = match self.value(DrinkColumn::Millilitres) {
            Some(Value::Integer(value)) => *value,
            Some(other) => return Err(decode_error(DrinkColumn::Millilitres, other)),
            None => return Err(missing_column(DrinkColumn::Millilitres)),
        };
        let recorded_at = match self.value(DrinkColumn::RecordedAt) {
            Some(Value::Text(text)) => text.clone(),
            Some(other) => return Err(decode_error(DrinkColumn::RecordedAt, other)),
            None => return Err(missing_column(DrinkColumn::RecordedAt)),
        };
        Ok(DrinkRecord {
            id,
            kind,
            millilitres,
            recorded_at,
        })
    }
}

fn missing_column(column: DrinkColumn) -> RepoError {
    RepoError::InvalidData(format!("column `{column}` missing from projection"))
}

fn decode_error(column: DrinkColumn, value: &Value) -> RepoError {
    RepoError::InvalidData(format!("unexpected value {value:?} in drinks.{column}"))
}
