//! SQLite backend for the rollcall attendance ledger.
//!
//! Owns the five entity tables and keeps the denormalized journal
//! consistent with its generating dimensions: cross-product generation on
//! date/student insert, and rename/delete cascades for every dimension.

mod encode;
mod schema;
mod store;

pub mod error;

pub use encode::Cell;
pub use error::{Error, Result};
pub use schema::Table;
pub use store::SqliteStore;
