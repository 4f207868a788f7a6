//! SQL schema for the rollcall SQLite store.
//!
//! Surrogate keys are plain autoincrement integers; every operation in the
//! store addresses rows by their natural-key columns instead.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS "Dates" (
    "id_date" INTEGER PRIMARY KEY AUTOINCREMENT,
    "date"    TEXT NOT NULL   -- YYYY-MM-DD
);

CREATE TABLE IF NOT EXISTS "Groups" (
    "id_group" INTEGER PRIMARY KEY AUTOINCREMENT,
    "group"    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS "Students" (
    "id_person"  INTEGER PRIMARY KEY AUTOINCREMENT,
    "group"      TEXT NOT NULL,   -- weak reference to Groups by name
    "surname"    TEXT NOT NULL,
    "name"       TEXT NOT NULL,
    "patronymic" TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS "Lessons" (
    "id_lesson" INTEGER PRIMARY KEY AUTOINCREMENT,
    "lesson"    TEXT NOT NULL
);

-- The denormalized attendance ledger: one row per date x student x lesson.
-- Student, date and lesson fields are copies; cascades keep them fresh.
CREATE TABLE IF NOT EXISTS "Journal" (
    "id"           INTEGER PRIMARY KEY AUTOINCREMENT,
    "date"         TEXT NOT NULL,
    "group"        TEXT NOT NULL,
    "surname"      TEXT NOT NULL,
    "name"         TEXT NOT NULL,
    "patronymic"   TEXT NOT NULL,
    "lesson"       TEXT NOT NULL,
    "missed_hours"                 -- '-' placeholder or a small integer
);

CREATE INDEX IF NOT EXISTS journal_date_idx   ON "Journal"("date");
CREATE INDEX IF NOT EXISTS journal_group_idx  ON "Journal"("group");
CREATE INDEX IF NOT EXISTS journal_lesson_idx ON "Journal"("lesson");
"#;

// ─── Tables ──────────────────────────────────────────────────────────────────

/// The five entity tables, used to address the generic store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
  Dates,
  Groups,
  Students,
  Lessons,
  Journal,
}

impl Table {
  pub fn name(self) -> &'static str {
    match self {
      Table::Dates => "Dates",
      Table::Groups => "Groups",
      Table::Students => "Students",
      Table::Lessons => "Lessons",
      Table::Journal => "Journal",
    }
  }

  /// Whitelist of addressable columns. Generic operations reject any
  /// identifier not in this list before it reaches SQL text.
  pub fn columns(self) -> &'static [&'static str] {
    match self {
      Table::Dates => &["date"],
      Table::Groups => &["group"],
      Table::Students => &["group", "surname", "name", "patronymic"],
      Table::Lessons => &["lesson"],
      Table::Journal => &[
        "date",
        "group",
        "surname",
        "name",
        "patronymic",
        "lesson",
        "missed_hours",
      ],
    }
  }
}
