//! Data access layer for the drinks table.
//!
//! # Responsibility
//! - Keep every piece of SQL for drink rows behind one repository API.
//! - Decode matched rows into typed records.
//!
//! # Invariants
//! - Repositories run whatever they are handed; field validation happens
//!   in the routing layer before any call lands here.
//! - All caller-supplied values are bound as parameters, never spliced
//!   into SQL text.

pub mod drink_repo;
pub mod rows;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository-level error.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Persisted data did not decode into the expected shape.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "database error: {err}"),
            Self::InvalidData(detail) => write!(f, "invalid persisted data: {detail}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(err: DbError) -> Self {
        Self::Db(err)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(err))
    }
}
