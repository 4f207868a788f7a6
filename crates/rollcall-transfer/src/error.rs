//! Error type for `rollcall-transfer`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("file error: {0}")]
  Io(#[from] std::io::Error),

  #[error(
    "could not determine the file format; supported: .json, .xml, .pkl, .msgpack"
  )]
  UnknownFormat,

  #[error("decode error: {0}")]
  Codec(#[from] rollcall_codec::Error),

  #[error("store error: {0}")]
  Store(#[from] rollcall_store_sqlite::Error),

  /// A payload that decoded but cannot be interpreted (e.g. non-UTF-8 text).
  #[error("malformed payload: {0}")]
  Malformed(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
