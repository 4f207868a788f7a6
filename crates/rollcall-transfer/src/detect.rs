//! Import-format classification: file extension first, content sniffing
//! second.

use std::path::Path;

/// Files larger than this trip the confirmation gate before importing.
pub const LARGE_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// How much of the file the content sniffer inspects.
const SNIFF_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
  /// Structured text (`.json`).
  Json,
  /// Markup (`.xml`).
  Xml,
  /// Native binary backup (`.pkl` / `.pickle`, kept for compatibility with
  /// historic exports).
  Native,
  /// Compact binary (`.msgpack` / `.mpk`).
  Compact,
}

impl Format {
  /// Classify by file extension, case-insensitively.
  pub fn from_path(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
      "json" => Some(Format::Json),
      "xml" => Some(Format::Xml),
      "pkl" | "pickle" => Some(Format::Native),
      "msgpack" | "mpk" => Some(Format::Compact),
      _ => None,
    }
  }

  /// Rough classification from the first bytes of the file. The compact
  /// binary format has no reliable marker and is matched by extension only.
  pub fn sniff(bytes: &[u8]) -> Option<Format> {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    if find(head, b"<?xml") {
      return Some(Format::Xml);
    }
    if head.contains(&b'{') || head.contains(&b'[') {
      return Some(Format::Json);
    }
    let lowered = head.to_ascii_lowercase();
    if head.iter().take(2).any(|&b| b == 0x80) || find(&lowered, b"pickle") {
      return Some(Format::Native);
    }
    None
  }
}

fn find(haystack: &[u8], needle: &[u8]) -> bool {
  haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extension_classification() {
    assert_eq!(Format::from_path(Path::new("a.json")), Some(Format::Json));
    assert_eq!(Format::from_path(Path::new("a.XML")), Some(Format::Xml));
    assert_eq!(Format::from_path(Path::new("a.pkl")), Some(Format::Native));
    assert_eq!(Format::from_path(Path::new("a.pickle")), Some(Format::Native));
    assert_eq!(Format::from_path(Path::new("a.mpk")), Some(Format::Compact));
    assert_eq!(Format::from_path(Path::new("a.txt")), None);
    assert_eq!(Format::from_path(Path::new("noext")), None);
  }

  #[test]
  fn content_sniffing() {
    assert_eq!(Format::sniff(b"<?xml version=\"1.0\"?>"), Some(Format::Xml));
    assert_eq!(Format::sniff(b"  [\"G1\"]"), Some(Format::Json));
    assert_eq!(Format::sniff(b"{\"groups\": []}"), Some(Format::Json));
    assert_eq!(Format::sniff(&[0x80, 0x01, 0x02]), Some(Format::Native));
    assert_eq!(Format::sniff(b"PICKLE data"), Some(Format::Native));
    assert_eq!(Format::sniff(b"plain text"), None);
    assert_eq!(Format::sniff(b""), None);
  }

  #[test]
  fn sniff_only_looks_at_the_head() {
    let mut bytes = vec![b'x'; 200];
    bytes[150] = b'{';
    assert_eq!(Format::sniff(&bytes), None);
  }
}
