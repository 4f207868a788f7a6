//! Error type for `rollcall-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] rollcall_core::Error),

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  /// A caller-supplied column name failed the per-table whitelist check.
  /// Identifiers are never interpolated from untrusted input.
  #[error("unknown column {column:?} on table {table}")]
  UnknownColumn { table: &'static str, column: String },

  #[error("at least one predicate is required")]
  EmptyPredicates,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
