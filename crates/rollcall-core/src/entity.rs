//! Entity records — the natural-key shapes that cross every boundary.
//!
//! Dates, groups and lessons travel as plain strings; students and journal
//! rows get their own records. Surrogate ids exist only in the SQLite
//! schema — every operation and every wire format speaks natural keys.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{Error, Result};

// ─── Missed hours ────────────────────────────────────────────────────────────

/// The `missed_hours` cell of a journal row: either the `"-"` placeholder
/// written by cross-product generation, or a small hour count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissedHours {
  #[default]
  NotMarked,
  Hours(u8),
}

/// Upper bound on a recorded hour count.
pub const MAX_MISSED_HOURS: u8 = 2;

impl MissedHours {
  /// Validated constructor for an explicit hour count.
  pub fn hours(n: u8) -> Result<Self> {
    if n > MAX_MISSED_HOURS {
      return Err(Error::Validation(format!(
        "missed hours {n} out of range 0..={MAX_MISSED_HOURS}"
      )));
    }
    Ok(MissedHours::Hours(n))
  }
}

impl fmt::Display for MissedHours {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MissedHours::NotMarked => write!(f, "-"),
      MissedHours::Hours(n) => write!(f, "{n}"),
    }
  }
}

impl FromStr for MissedHours {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    if s == "-" {
      return Ok(MissedHours::NotMarked);
    }
    let n: u8 = s
      .parse()
      .map_err(|_| Error::Validation(format!("invalid missed hours: {s:?}")))?;
    MissedHours::hours(n)
  }
}

// On the wire the cell is the string "-" or a bare integer, matching the
// column in the persisted schema. Only self-describing formats can decode
// this; the native binary codec carries its own tagged mirror.
impl Serialize for MissedHours {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      MissedHours::NotMarked => serializer.serialize_str("-"),
      MissedHours::Hours(n) => serializer.serialize_u8(*n),
    }
  }
}

impl<'de> Deserialize<'de> for MissedHours {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct Visitor;

    impl de::Visitor<'_> for Visitor {
      type Value = MissedHours;

      fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"-\" or an integer 0..={MAX_MISSED_HOURS}")
      }

      fn visit_str<E: de::Error>(self, v: &str) -> Result<MissedHours, E> {
        v.parse().map_err(E::custom)
      }

      fn visit_u64<E: de::Error>(self, v: u64) -> Result<MissedHours, E> {
        let n = u8::try_from(v).map_err(E::custom)?;
        MissedHours::hours(n).map_err(E::custom)
      }

      fn visit_i64<E: de::Error>(self, v: i64) -> Result<MissedHours, E> {
        let n = u8::try_from(v).map_err(E::custom)?;
        MissedHours::hours(n).map_err(E::custom)
      }
    }

    deserializer.deserialize_any(Visitor)
  }
}

// ─── Students ────────────────────────────────────────────────────────────────

/// A student identified by the (group, surname, name, patronymic) 4-tuple.
///
/// `group` is a weak reference to a group by name, not an owning key —
/// deleting the group cascades, but a student never owns its group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
  pub group:      String,
  pub surname:    String,
  pub name:       String,
  pub patronymic: String,
}

impl fmt::Display for StudentRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} {} {} in group {}",
      self.surname, self.name, self.patronymic, self.group
    )
  }
}

// ─── Journal ─────────────────────────────────────────────────────────────────

/// One denormalized ledger row: date × student × lesson, plus hours missed.
///
/// The student and lesson fields are copies, not references — that is what
/// makes rename and delete cascades necessary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
  pub date:         String,
  pub group:        String,
  pub surname:      String,
  pub name:         String,
  pub patronymic:   String,
  pub lesson:       String,
  pub missed_hours: MissedHours,
}

// ─── Backup bundle ───────────────────────────────────────────────────────────

/// The full-backup bundle covering all five collections. Field names are
/// the wire keys of the text and binary backup formats; a partial bundle
/// decodes with the missing collections empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Backup {
  pub groups:   Vec<String>,
  pub students: Vec<StudentRecord>,
  pub lessons:  Vec<String>,
  pub dates:    Vec<String>,
  pub journal:  Vec<JournalRecord>,
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Compose and validate a `YYYY-MM-DD` class-date string.
pub fn compose_date(year: i32, month: u32, day: u32) -> Result<String> {
  let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
    Error::Validation(format!("invalid calendar date {year}-{month}-{day}"))
  })?;
  Ok(date.format("%Y-%m-%d").to_string())
}

/// Validate an already-composed `YYYY-MM-DD` string (import path).
pub fn parse_date(s: &str) -> Result<String> {
  let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|_| Error::Validation(format!("invalid date string {s:?}")))?;
  Ok(date.format("%Y-%m-%d").to_string())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missed_hours_display_and_parse() {
    assert_eq!(MissedHours::NotMarked.to_string(), "-");
    assert_eq!(MissedHours::Hours(2).to_string(), "2");
    assert_eq!("-".parse::<MissedHours>().unwrap(), MissedHours::NotMarked);
    assert_eq!("0".parse::<MissedHours>().unwrap(), MissedHours::Hours(0));
    assert!("3".parse::<MissedHours>().is_err());
    assert!("x".parse::<MissedHours>().is_err());
  }

  #[test]
  fn compose_date_zero_pads() {
    assert_eq!(compose_date(2024, 1, 5).unwrap(), "2024-01-05");
  }

  #[test]
  fn compose_date_rejects_impossible_dates() {
    assert!(compose_date(2024, 2, 30).is_err());
    assert!(compose_date(2024, 13, 1).is_err());
  }

  #[test]
  fn parse_date_normalizes() {
    assert_eq!(parse_date("2024-01-15").unwrap(), "2024-01-15");
    assert!(parse_date("2024-1-15-x").is_err());
    assert!(parse_date("yesterday").is_err());
  }
}
