//! Persistence Adapters - Flat-File JSON Document Store
//!
//! Implements the `DocumentStore` port over a single `db.json`
//! holding all four collections, with atomic whole-file overwrite.
//! No database dependency — lightweight and crash-recoverable.

pub mod file;
pub mod json_store;
pub mod query;

pub use file::{DbFile, StoreState};
pub use json_store::JsonStore;
