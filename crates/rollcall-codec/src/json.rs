//! The text codec: human-readable structured JSON.
//!
//! Two top-level shapes share this codec: a flat list (group names, or
//! 4-field student rows) and the full-backup bundle. Decoding is an
//! untagged union over both, so the importer gets one entry point.

use rollcall_core::{Backup, StudentRecord};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Everything the text codec can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
  /// Full-backup bundle keyed `groups` / `students` / `lessons` / `dates` /
  /// `journal`.
  Bundle(Backup),
  /// A flat export, e.g. a list of group names.
  Flat(Vec<FlatItem>),
}

/// One element of a flat export.
///
/// A student decodes from either a keyed map or a positional 4-element
/// sequence (group, surname, name, patronymic): the derived struct
/// Deserialize accepts both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlatItem {
  /// A bare string is a group (or lesson) name.
  Name(String),
  /// A student record.
  Student(StudentRecord),
}

pub fn encode(document: &Document) -> Result<String> {
  Ok(serde_json::to_string_pretty(document)?)
}

pub fn decode(text: &str) -> Result<Document> {
  Ok(serde_json::from_str(text)?)
}

/// Convenience for the common groups export.
pub fn encode_names(names: &[String]) -> Result<String> {
  let items: Vec<FlatItem> =
    names.iter().cloned().map(FlatItem::Name).collect();
  encode(&Document::Flat(items))
}

#[cfg(test)]
mod tests {
  use rollcall_core::{JournalRecord, MissedHours};

  use super::*;

  #[test]
  fn names_round_trip() {
    let names = vec!["G1".to_owned(), "G2".to_owned()];
    let text = encode_names(&names).unwrap();
    let decoded = decode(&text).unwrap();
    assert_eq!(
      decoded,
      Document::Flat(vec![
        FlatItem::Name("G1".into()),
        FlatItem::Name("G2".into())
      ])
    );
  }

  #[test]
  fn bundle_round_trip_is_exact() {
    let bundle = Backup {
      groups:   vec!["G1".into()],
      students: vec![StudentRecord {
        group:      "G1".into(),
        surname:    "Ivanov".into(),
        name:       "Ivan".into(),
        patronymic: "Ivanovich".into(),
      }],
      lessons:  vec!["Math".into()],
      dates:    vec!["2024-01-15".into()],
      journal:  vec![
        JournalRecord {
          date:         "2024-01-15".into(),
          group:        "G1".into(),
          surname:      "Ivanov".into(),
          name:         "Ivan".into(),
          patronymic:   "Ivanovich".into(),
          lesson:       "Math".into(),
          missed_hours: MissedHours::NotMarked,
        },
        JournalRecord {
          date:         "2024-01-15".into(),
          group:        "G1".into(),
          surname:      "Ivanov".into(),
          name:         "Ivan".into(),
          patronymic:   "Ivanovich".into(),
          lesson:       "Physics".into(),
          missed_hours: MissedHours::Hours(2),
        },
      ],
    };

    let text = encode(&Document::Bundle(bundle.clone())).unwrap();
    // missed hours serialize as the placeholder string or a bare integer
    assert!(text.contains("\"-\""));
    assert!(text.contains(": 2"));

    match decode(&text).unwrap() {
      Document::Bundle(decoded) => assert_eq!(decoded, bundle),
      other => panic!("expected bundle, got {other:?}"),
    }
  }

  #[test]
  fn partial_bundle_decodes_with_missing_collections_empty() {
    let decoded = decode(r#"{"groups": ["G1"]}"#).unwrap();
    match decoded {
      Document::Bundle(bundle) => {
        assert_eq!(bundle.groups, vec!["G1"]);
        assert!(bundle.students.is_empty());
        assert!(bundle.journal.is_empty());
      }
      other => panic!("expected bundle, got {other:?}"),
    }
  }

  #[test]
  fn positional_student_rows_decode() {
    let text = r#"[["G1", "Ivanov", "Ivan", "Ivanovich"], "G2"]"#;
    let decoded = decode(text).unwrap();
    assert_eq!(
      decoded,
      Document::Flat(vec![
        FlatItem::Student(StudentRecord {
          group:      "G1".into(),
          surname:    "Ivanov".into(),
          name:       "Ivan".into(),
          patronymic: "Ivanovich".into(),
        }),
        FlatItem::Name("G2".into()),
      ])
    );
  }

  #[test]
  fn malformed_input_is_an_error() {
    assert!(decode("{ not json").is_err());
  }
}
