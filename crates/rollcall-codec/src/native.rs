//! The native binary codec: full-fidelity serialization of the backup
//! bundle.
//!
//! Payloads start with a 4-byte magic header whose first byte is `0x80` —
//! the marker the importer's content sniffer looks for — followed by a
//! `bitcode` body. bitcode is not self-describing, so the bundle travels
//! as a tagged mirror of the core types rather than through their wire
//! (`"-"`-or-integer) serde impls.

use rollcall_core::{Backup, JournalRecord, MissedHours, StudentRecord};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Magic header; `0x80` first so content sniffing classifies the file.
pub const MAGIC: [u8; 4] = [0x80, b'R', b'C', b'B'];

// ─── Tagged mirror types ─────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
enum Hours {
  NotMarked,
  Hours(u8),
}

#[derive(Serialize, Deserialize)]
struct Row {
  date:       String,
  group:      String,
  surname:    String,
  name:       String,
  patronymic: String,
  lesson:     String,
  missed:     Hours,
}

#[derive(Serialize, Deserialize)]
struct Bundle {
  groups:   Vec<String>,
  students: Vec<StudentRecord>,
  lessons:  Vec<String>,
  dates:    Vec<String>,
  journal:  Vec<Row>,
}

impl From<&Backup> for Bundle {
  fn from(b: &Backup) -> Self {
    Bundle {
      groups:   b.groups.clone(),
      students: b.students.clone(),
      lessons:  b.lessons.clone(),
      dates:    b.dates.clone(),
      journal:  b.journal.iter().map(row_from_record).collect(),
    }
  }
}

impl From<Bundle> for Backup {
  fn from(b: Bundle) -> Self {
    Backup {
      groups:   b.groups,
      students: b.students,
      lessons:  b.lessons,
      dates:    b.dates,
      journal:  b.journal.into_iter().map(record_from_row).collect(),
    }
  }
}

fn row_from_record(r: &JournalRecord) -> Row {
  Row {
    date:       r.date.clone(),
    group:      r.group.clone(),
    surname:    r.surname.clone(),
    name:       r.name.clone(),
    patronymic: r.patronymic.clone(),
    lesson:     r.lesson.clone(),
    missed:     match r.missed_hours {
      MissedHours::NotMarked => Hours::NotMarked,
      MissedHours::Hours(n) => Hours::Hours(n),
    },
  }
}

fn record_from_row(r: Row) -> JournalRecord {
  JournalRecord {
    date:         r.date,
    group:        r.group,
    surname:      r.surname,
    name:         r.name,
    patronymic:   r.patronymic,
    lesson:       r.lesson,
    missed_hours: match r.missed {
      Hours::NotMarked => MissedHours::NotMarked,
      Hours::Hours(n) => MissedHours::Hours(n),
    },
  }
}

// ─── Encode / decode ─────────────────────────────────────────────────────────

pub fn encode(backup: &Backup) -> Result<Vec<u8>> {
  let body = bitcode::serialize(&Bundle::from(backup))
    .map_err(|e| Error::Native(e.to_string()))?;
  let mut out = Vec::with_capacity(MAGIC.len() + body.len());
  out.extend_from_slice(&MAGIC);
  out.extend_from_slice(&body);
  Ok(out)
}

pub fn decode(bytes: &[u8]) -> Result<Backup> {
  let body = bytes
    .strip_prefix(MAGIC.as_slice())
    .ok_or_else(|| Error::Native("missing magic header".into()))?;
  let bundle: Bundle =
    bitcode::deserialize(body).map_err(|e| Error::Native(e.to_string()))?;
  Ok(bundle.into())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> Backup {
    Backup {
      groups:   vec!["G1".into()],
      students: vec![StudentRecord {
        group:      "G1".into(),
        surname:    "Ivanov".into(),
        name:       "Ivan".into(),
        patronymic: "Ivanovich".into(),
      }],
      lessons:  vec!["Math".into()],
      dates:    vec!["2024-01-15".into()],
      journal:  vec![JournalRecord {
        date:         "2024-01-15".into(),
        group:        "G1".into(),
        surname:      "Ivanov".into(),
        name:         "Ivan".into(),
        patronymic:   "Ivanovich".into(),
        lesson:       "Math".into(),
        missed_hours: MissedHours::Hours(1),
      }],
    }
  }

  #[test]
  fn round_trip_is_exact() {
    let backup = sample();
    let bytes = encode(&backup).unwrap();
    assert_eq!(&bytes[..4], &MAGIC);
    assert_eq!(decode(&bytes).unwrap(), backup);
  }

  #[test]
  fn missing_magic_is_rejected() {
    let mut bytes = encode(&sample()).unwrap();
    bytes[0] = 0x00;
    assert!(matches!(decode(&bytes), Err(Error::Native(_))));
  }

  #[test]
  fn truncated_body_is_an_error() {
    let bytes = encode(&sample()).unwrap();
    assert!(decode(&bytes[..bytes.len() / 2]).is_err());
  }
}
