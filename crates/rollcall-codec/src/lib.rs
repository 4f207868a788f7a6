//! Serialization codecs for the rollcall attendance ledger.
//!
//! Four independent, symmetric codecs over the same in-memory shapes:
//!
//! - [`json`] — human-readable structured text, exact round trip.
//! - [`xml`] — deterministically indented markup on encode; a shallow
//!   generic tree on decode (downstream merge logic interprets it).
//! - [`native`] — full-fidelity binary backup with a magic header.
//! - [`compact`] — schema-less MessagePack of the text-codec shapes.
//!
//! Codecs operate on bytes and strings only; file IO belongs to the
//! transfer layer.

pub mod compact;
pub mod error;
pub mod json;
pub mod native;
pub mod xml;

pub use error::{Error, Result};
pub use json::{Document, FlatItem};
pub use xml::{XmlChild, XmlDocument, XmlItem};
