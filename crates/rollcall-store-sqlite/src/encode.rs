//! Encoding helpers between domain types and SQLite column values.
//!
//! `missed_hours` is the one dynamically-typed column: the `"-"` placeholder
//! is stored as text, a recorded hour count as an integer.

use std::fmt;

use rollcall_core::{JournalRecord, MissedHours, StudentRecord};
use rusqlite::{
  Row,
  types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef},
};

// ─── Missed hours ────────────────────────────────────────────────────────────

/// Newtype bridging [`MissedHours`] to rusqlite's `ToSql`/`FromSql`.
#[derive(Debug, Clone, Copy)]
pub struct SqlHours(pub MissedHours);

impl ToSql for SqlHours {
  fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
    Ok(match self.0 {
      MissedHours::NotMarked => ToSqlOutput::Owned(Value::Text("-".to_owned())),
      MissedHours::Hours(n) => ToSqlOutput::Owned(Value::Integer(i64::from(n))),
    })
  }
}

impl FromSql for SqlHours {
  fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
    let hours = match value {
      ValueRef::Integer(n) => {
        let n = u8::try_from(n).map_err(|e| FromSqlError::Other(Box::new(e)))?;
        MissedHours::hours(n).map_err(|e| FromSqlError::Other(Box::new(e)))?
      }
      ValueRef::Text(t) => {
        let s = std::str::from_utf8(t).map_err(|_| FromSqlError::InvalidType)?;
        s.parse().map_err(|e: rollcall_core::Error| {
          FromSqlError::Other(Box::new(e))
        })?
      }
      _ => return Err(FromSqlError::InvalidType),
    };
    Ok(SqlHours(hours))
  }
}

// ─── Cells ───────────────────────────────────────────────────────────────────

/// One projected value: SQLite's dynamic typing narrowed to what the schema
/// actually stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
  Text(String),
  Int(i64),
}

impl FromSql for Cell {
  fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
    match value {
      ValueRef::Integer(n) => Ok(Cell::Int(n)),
      ValueRef::Text(t) => {
        let s = std::str::from_utf8(t).map_err(|_| FromSqlError::InvalidType)?;
        Ok(Cell::Text(s.to_owned()))
      }
      ValueRef::Null => Ok(Cell::Text(String::new())),
      _ => Err(FromSqlError::InvalidType),
    }
  }
}

impl fmt::Display for Cell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Cell::Text(s) => write!(f, "{s}"),
      Cell::Int(n) => write!(f, "{n}"),
    }
  }
}

// ─── Row mappers ─────────────────────────────────────────────────────────────

pub fn student_from_row(row: &Row<'_>) -> rusqlite::Result<StudentRecord> {
  Ok(StudentRecord {
    group:      row.get(0)?,
    surname:    row.get(1)?,
    name:       row.get(2)?,
    patronymic: row.get(3)?,
  })
}

pub fn journal_from_row(row: &Row<'_>) -> rusqlite::Result<JournalRecord> {
  let hours: SqlHours = row.get(6)?;
  Ok(JournalRecord {
    date:         row.get(0)?,
    group:        row.get(1)?,
    surname:      row.get(2)?,
    name:         row.get(3)?,
    patronymic:   row.get(4)?,
    lesson:       row.get(5)?,
    missed_hours: hours.0,
  })
}

// ─── LIKE escaping ───────────────────────────────────────────────────────────

/// Escape `%`, `_` and the escape character itself so a caller-supplied
/// prefix is matched literally under `LIKE ... ESCAPE '\'`.
pub fn escape_like(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(ch);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escape_like_wildcards() {
    assert_eq!(escape_like("2024-01"), "2024-01");
    assert_eq!(escape_like("a%b_c\\d"), "a\\%b\\_c\\\\d");
  }
}
