//! Error types for `rollcall-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The natural key is already taken.
  #[error("{0} already exists")]
  Duplicate(String),

  /// The natural key was not found on an update or delete.
  #[error("{0} not found")]
  NotFound(String),

  /// A malformed field, or a rename where old and new keys are identical.
  #[error("{0}")]
  Validation(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
