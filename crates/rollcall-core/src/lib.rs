//! Core types for the rollcall attendance ledger.
//!
//! This crate carries no database or codec dependencies. All other crates
//! in the workspace depend on it.

pub mod entity;
pub mod error;
pub mod text;
pub mod validate;

pub use entity::{
  Backup, JournalRecord, MissedHours, StudentRecord, compose_date, parse_date,
};
pub use error::{Error, Result};
