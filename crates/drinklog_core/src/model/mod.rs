//! Domain model for logged drinks.
//!
//! # Responsibility
//! - Define the drink record read model and its column set.
//! - Define the write-side field mapping and the validation rules shared
//!   by every mutating operation.
//!
//! # Invariants
//! - Serialized field names match the storage column names.
//!
//! # See also
//! - `docs/architecture/data-model.md`

pub mod drink;
