//! Import and export between the attendance store and files on disk.
//!
//! The importer classifies an input file by extension, then by content
//! sniffing, decodes it through the matching codec, normalizes the decoded
//! shape into candidate records and merges them idempotently. The exporter
//! pulls projections from the store and pushes them through a chosen codec.

mod detect;
mod export;
mod import;

pub mod error;

pub use detect::{Format, LARGE_FILE_BYTES};
pub use error::{Error, Result};
pub use export::Exporter;
pub use import::{ImportOutcome, ImportReport, Importer};

#[cfg(test)]
mod tests;
