//! Dataset loading.
//!
//! Reads the load postings and load stops tables once at startup and keeps
//! them as an immutable store shared by every query.

pub mod columns;
mod error;
mod source;
mod store;

pub use error::LoadError;
pub use source::{CsvSource, Row, TabularSource, read_rows};
pub use store::DatasetStore;
