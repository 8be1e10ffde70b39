//! FFI surface crate for the drink store.
//! Host-facing functions live in [`api`]; nothing else is exported.

pub mod api;
