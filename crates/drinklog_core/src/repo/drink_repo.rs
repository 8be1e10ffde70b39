//! Drink repository contract and its SQLite implementation.
//!
//! # Responsibility
//! - Generate and run the SQL for insert, query, update and delete over
//!   the drinks table.
//! - Map engine-level insert rejection to the absent-id sentinel.
//!
//! # Invariants
//! - Generated statements use positional `?` placeholders exclusively.
//! - Insert returns `Ok(None)` only for constraint-class failures; every
//!   other engine error propagates as `Err`.

use crate::contract;
use crate::model::drink::{DrinkColumn, DrinkValues, RecordId};
use crate::repo::rows::RecordSet;
use crate::repo::RepoResult;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode};

/// Row predicate applied to query, update and delete.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    clause: String,
    args: Vec<Value>,
}

impl Filter {
    /// Filter from a raw SQL predicate with positional `?` placeholders
    /// and their bound arguments.
    pub fn new(clause: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            clause: clause.into(),
            args,
        }
    }

    /// Filter selecting exactly one row by storage id.
    pub fn record_id(id: RecordId) -> Self {
        Self {
            clause: format!("{} = ?", DrinkColumn::Id),
            args: vec![Value::Integer(id)],
        }
    }

    pub fn clause(&self) -> &str {
        &self.clause
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

/// Read options for the query path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordQuery {
    /// Columns to return; `None` or empty selects the full contract set.
    pub projection: Option<Vec<DrinkColumn>>,
    /// Optional row predicate.
    pub filter: Option<Filter>,
    /// Raw `ORDER BY` body, e.g. `datetime DESC`.
    pub order: Option<String>,
}

/// Storage operations over drink rows.
pub trait DrinkRepository {
    /// Inserts one row.
    ///
    /// Returns the new row id, or `None` when the engine rejects the row
    /// with a constraint-class failure.
    fn insert(&self, values: &DrinkValues) -> RepoResult<Option<RecordId>>;

    /// Rows matching `query`, under its projection and order.
    fn query(&self, query: &RecordQuery) -> RepoResult<RecordSet>;

    /// Applies a non-empty mapping to all rows matching `filter`; returns
    /// the number of rows changed. `None` matches every row.
    fn update(&self, values: &DrinkValues, filter: Option<&Filter>) -> RepoResult<usize>;

    /// Removes all rows matching `filter`; returns the number of rows
    /// removed. `None` matches every row.
    fn delete(&self, filter: Option<&Filter>) -> RepoResult<usize>;
}

/// SQLite-backed drink repository borrowing an open connection.
pub struct SqliteDrinkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDrinkRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DrinkRepository for SqliteDrinkRepository<'_> {
    fn insert(&self, values: &DrinkValues) -> RepoResult<Option<RecordId>> {
        let mut columns = Vec::with_capacity(values.len());
        let mut binds: Vec<Value> = Vec::with_capacity(values.len());
        for (column, value) in values.entries() {
            columns.push(column.as_str());
            binds.push(value.clone());
        }
        // An empty mapping still attempts a row; the NOT NULL constraint
        // then surfaces as the rejection sentinel.
        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES;", contract::DRINKS_TABLE)
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({});",
                contract::DRINKS_TABLE,
                columns.join(", "),
                vec!["?"; binds.len()].join(", ")
            )
        };

        match self.conn.execute(&sql, params_from_iter(binds)) {
            Ok(_) => Ok(Some(self.conn.last_insert_rowid())),
            Err(rusqlite::Error::SqliteFailure(db_err, message))
                if db_err.code == ErrorCode::ConstraintViolation =>
            {
                debug!(
                    "event=row_insert module=repo status=rejected detail={}",
                    message.as_deref().unwrap_or("constraint violation")
                );
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn query(&self, query: &RecordQuery) -> RepoResult<RecordSet> {
        let columns = effective_projection(query.projection.as_deref());
        let column_list = columns
            .iter()
            .map(|column| column.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("SELECT {column_list} FROM {}", contract::DRINKS_TABLE);
        let mut binds: Vec<Value> = Vec::new();
        if let Some(filter) = query.filter.as_ref() {
            sql.push_str(" WHERE ");
            sql.push_str(filter.clause());
            binds.extend(filter.args().iter().cloned());
        }
        if let Some(order) = query.order.as_deref() {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        sql.push(';');

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut matched: Vec<Vec<Value>> = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                values.push(row.get::<_, Value>(index)?);
            }
            matched.push(values);
        }
        Ok(RecordSet::new(columns, matched))
    }

    fn update(&self, values: &DrinkValues, filter: Option<&Filter>) -> RepoResult<usize> {
        let mut assignments = Vec::with_capacity(values.len());
        let mut binds: Vec<Value> = Vec::with_capacity(values.len() + 1);
        for (column, value) in values.entries() {
            assignments.push(format!("{} = ?", column.as_str()));
            binds.push(value.clone());
        }

        let mut sql = format!(
            "UPDATE {} SET {}",
            contract::DRINKS_TABLE,
            assignments.join(", ")
        );
        if let Some(filter) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(filter.clause());
            binds.extend(filter.args().iter().cloned());
        }
        sql.push(';');

        let changed = self.conn.execute(&sql, params_from_iter(binds))?;
        Ok(changed)
    }

    fn delete(&self, filter: Option<&Filter>) -> RepoResult<usize> {
        let mut sql = format!("DELETE FROM {}", contract::DRINKS_TABLE);
        let mut binds: Vec<Value> = Vec::new();
        if let Some(filter) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(filter.clause());
            binds.extend(filter.args().iter().cloned());
        }
        sql.push(';');

        let removed = self.conn.execute(&sql, params_from_iter(binds))?;
        Ok(removed)
    }
}

fn effective_projection(projection: Option<&[DrinkColumn]>) -> Vec<DrinkColumn> {
    match projection {
        Some(columns) if !columns.is_empty() => columns.to_vec(),
        _ => DrinkColumn::ALL.to_vec(),
    }
}
