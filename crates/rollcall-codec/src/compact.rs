//! The compact binary codec: schema-less MessagePack over the same shapes
//! as the text codec.
//!
//! MessagePack is self-describing, so any conforming encoder's payload
//! decodes here — including ones produced by a different process.

use crate::{Document, Error, FlatItem, Result};

// `to_vec_named` keeps map keys in the payload, so a bundle stays readable
// by consumers that never saw our type definitions.
pub fn encode(document: &Document) -> Result<Vec<u8>> {
  rmp_serde::to_vec_named(document).map_err(|e| Error::Compact(e.to_string()))
}

pub fn decode(bytes: &[u8]) -> Result<Document> {
  rmp_serde::from_slice(bytes).map_err(|e| Error::Compact(e.to_string()))
}

/// Convenience for the common groups export.
pub fn encode_names(names: &[String]) -> Result<Vec<u8>> {
  let items: Vec<FlatItem> =
    names.iter().cloned().map(FlatItem::Name).collect();
  encode(&Document::Flat(items))
}
