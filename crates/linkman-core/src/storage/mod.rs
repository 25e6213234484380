//! Storage layer
//!
//! Links live in a single SQLite file.
//!
//! ## Layout
//!
//! - `schema`: table and index definitions
//! - `database`: scoped open/close around each operation
//! - `query`: filter to SQL predicate translation
//! - `error`: typed storage errors

pub mod database;
pub mod error;
pub mod query;
pub mod schema;

pub use database::with_connection;
pub use error::{StorageError, StorageResult};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
