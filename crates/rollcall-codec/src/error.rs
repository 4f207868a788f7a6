//! Error type for `rollcall-codec`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("xml error: {0}")]
  Xml(String),

  #[error("native binary error: {0}")]
  Native(String),

  #[error("compact binary error: {0}")]
  Compact(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
