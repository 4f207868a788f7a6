//! [`SqliteStore`] — the entity store plus the ledger cross-product
//! maintainer.
//!
//! Every mutating operation runs inside a single transaction: either the
//! entity change and all of its journal cascades commit together, or
//! nothing does. Values are always bound as SQL parameters; identifiers
//! come from the [`Table`] whitelist, never from caller strings.

use std::path::Path;

use rusqlite::{Connection, ToSql, params, params_from_iter};

use rollcall_core::{
  Backup, Error as CoreError, JournalRecord, MissedHours, StudentRecord,
  compose_date,
};

use crate::{
  Result,
  encode::{Cell, SqlHours, escape_like, journal_from_row, student_from_row},
  error::Error,
  schema::{SCHEMA, Table},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The attendance store backed by a single SQLite file.
///
/// Single-threaded and synchronous: all access happens from one logical
/// thread of control, so transaction atomicity is the only locking
/// discipline needed.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = Connection::open(&path)?;
    conn.execute_batch(SCHEMA)?;
    tracing::info!(path = %path.as_ref().display(), "opened attendance store");
    Ok(Self { conn })
  }

  /// Open an in-memory store — useful for testing.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn })
  }

  /// Drop all five tables and recreate them empty.
  pub fn clear(&mut self) -> Result<()> {
    let tx = self.conn.transaction()?;
    for table in [
      Table::Dates,
      Table::Groups,
      Table::Students,
      Table::Lessons,
      Table::Journal,
    ] {
      tx.execute_batch(&format!("DROP TABLE IF EXISTS \"{}\";", table.name()))?;
    }
    tx.commit()?;
    self.conn.execute_batch(SCHEMA)?;
    tracing::info!("store cleared");
    Ok(())
  }

  // ── Generic operations ────────────────────────────────────────────────────

  /// Equality-predicate existence check; the pre-condition for every insert
  /// and rename.
  pub fn exists(
    &self,
    table: Table,
    predicates: &[(&str, &dyn ToSql)],
  ) -> Result<bool> {
    exists_on(&self.conn, table, predicates)
  }

  /// `SELECT DISTINCT` projection over `columns`, optionally ordered
  /// lexicographically by `order_by`.
  pub fn project(
    &self,
    table: Table,
    columns: &[&str],
    order_by: Option<&[&str]>,
  ) -> Result<Vec<Vec<Cell>>> {
    check_columns(table, columns)?;
    let mut sql = format!(
      "SELECT DISTINCT {} FROM \"{}\"",
      quote_list(columns),
      table.name()
    );
    push_order_by(&mut sql, table, order_by)?;

    let mut stmt = self.conn.prepare(&sql)?;
    let rows = stmt
      .query_map([], |row| cells_from_row(row, columns.len()))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
  }

  /// Query where the first predicate is a string-prefix match and the rest
  /// are equality; used for the year-month filtering of dates and journal
  /// slices.
  pub fn query_prefix(
    &self,
    table: Table,
    columns: &[&str],
    prefix: (&str, &str),
    equals: &[(&str, &dyn ToSql)],
    order_by: Option<&[&str]>,
  ) -> Result<Vec<Vec<Cell>>> {
    check_columns(table, columns)?;
    check_columns(table, &[prefix.0])?;
    let equal_cols: Vec<&str> = equals.iter().map(|(c, _)| *c).collect();
    check_columns(table, &equal_cols)?;

    let mut sql = format!(
      "SELECT {} FROM \"{}\" WHERE \"{}\" LIKE ?1 ESCAPE '\\'",
      quote_list(columns),
      table.name(),
      prefix.0
    );
    for (i, col) in equal_cols.iter().enumerate() {
      sql.push_str(&format!(" AND \"{col}\" IS ?{}", i + 2));
    }
    push_order_by(&mut sql, table, order_by)?;

    let pattern = format!("{}%", escape_like(prefix.1));
    let mut values: Vec<&dyn ToSql> = vec![&pattern];
    values.extend(equals.iter().map(|(_, v)| *v));

    let mut stmt = self.conn.prepare(&sql)?;
    let rows = stmt
      .query_map(params_from_iter(values), |row| {
        cells_from_row(row, columns.len())
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
  }

  // ── Inserts (with cross-product generation) ───────────────────────────────

  /// Insert a class date. Returns `false` without touching the store when
  /// the date already exists. On insert, generates one journal row per
  /// existing (student × lesson) pair with the `"-"` placeholder, skipping
  /// pairs that already have one.
  pub fn insert_date(&mut self, year: i32, month: u32, day: u32) -> Result<bool> {
    let date = compose_date(year, month, day)?;
    if self.exists(Table::Dates, &[("date", &date)])? {
      return Ok(false);
    }

    let tx = self.conn.transaction()?;
    tx.execute("INSERT INTO \"Dates\" (\"date\") VALUES (?1)", params![date])?;

    let students = students_on(&tx)?;
    let lessons = lesson_titles_on(&tx)?;
    let mut generated = 0usize;
    for student in &students {
      for lesson in &lessons {
        if !journal_triple_exists(&tx, &date, student, lesson)? {
          insert_journal_row(&tx, &JournalRecord {
            date:         date.clone(),
            group:        student.group.clone(),
            surname:      student.surname.clone(),
            name:         student.name.clone(),
            patronymic:   student.patronymic.clone(),
            lesson:       lesson.clone(),
            missed_hours: MissedHours::NotMarked,
          })?;
          generated += 1;
        }
      }
    }
    tx.commit()?;

    tracing::info!(%date, generated, "date inserted");
    Ok(true)
  }

  /// Insert a group. Returns `false` if a group with this name exists.
  pub fn insert_group(&mut self, name: &str) -> Result<bool> {
    if self.exists(Table::Groups, &[("group", &name)])? {
      return Ok(false);
    }
    self
      .conn
      .execute("INSERT INTO \"Groups\" (\"group\") VALUES (?1)", params![name])?;
    tracing::info!(group = name, "group inserted");
    Ok(true)
  }

  /// Insert a student. Returns `false` without side effects when the
  /// 4-tuple already exists. On insert, backfills one journal row per
  /// existing (date × lesson), skipping triples that already have one.
  pub fn insert_student(&mut self, student: &StudentRecord) -> Result<bool> {
    if self.student_exists(student)? {
      return Ok(false);
    }

    let tx = self.conn.transaction()?;
    tx.execute(
      "INSERT INTO \"Students\" (\"group\", \"surname\", \"name\", \"patronymic\")
       VALUES (?1, ?2, ?3, ?4)",
      params![student.group, student.surname, student.name, student.patronymic],
    )?;

    let dates = dates_on(&tx)?;
    let lessons = lesson_titles_on(&tx)?;
    let mut generated = 0usize;
    for date in &dates {
      for lesson in &lessons {
        if !journal_triple_exists(&tx, date, student, lesson)? {
          insert_journal_row(&tx, &JournalRecord {
            date:         date.clone(),
            group:        student.group.clone(),
            surname:      student.surname.clone(),
            name:         student.name.clone(),
            patronymic:   student.patronymic.clone(),
            lesson:       lesson.clone(),
            missed_hours: MissedHours::NotMarked,
          })?;
          generated += 1;
        }
      }
    }
    tx.commit()?;

    tracing::info!(student = %student, generated, "student inserted");
    Ok(true)
  }

  /// Insert a lesson. Returns `false` if the title exists.
  ///
  /// Does NOT backfill journal rows for existing date×student pairs; only
  /// date and student inserts generate the cross-product.
  pub fn insert_lesson(&mut self, title: &str) -> Result<bool> {
    if self.exists(Table::Lessons, &[("lesson", &title)])? {
      return Ok(false);
    }
    self.conn.execute(
      "INSERT INTO \"Lessons\" (\"lesson\") VALUES (?1)",
      params![title],
    )?;
    tracing::info!(lesson = title, "lesson inserted");
    Ok(true)
  }

  // ── Renames (with cascades) ───────────────────────────────────────────────

  /// Rename a class date, cascading into every journal row carrying it.
  pub fn rename_date(
    &mut self,
    old: (i32, u32, u32),
    new: (i32, u32, u32),
  ) -> Result<()> {
    let old = compose_date(old.0, old.1, old.2)?;
    let new = compose_date(new.0, new.1, new.2)?;
    if old == new {
      return Err(
        CoreError::Validation(format!("dates {old} and {new} are identical"))
          .into(),
      );
    }
    if !self.exists(Table::Dates, &[("date", &old)])? {
      return Err(CoreError::NotFound(format!("date {old}")).into());
    }
    if self.exists(Table::Dates, &[("date", &new)])? {
      return Err(CoreError::Duplicate(format!("date {new}")).into());
    }

    let tx = self.conn.transaction()?;
    tx.execute(
      "UPDATE \"Dates\" SET \"date\" = ?1 WHERE \"date\" = ?2",
      params![new, old],
    )?;
    tx.execute(
      "UPDATE \"Journal\" SET \"date\" = ?1 WHERE \"date\" = ?2",
      params![new, old],
    )?;
    tx.commit()?;
    tracing::info!(%old, %new, "date renamed");
    Ok(())
  }

  /// Rename a group, cascading into students and journal rows.
  pub fn rename_group(&mut self, old: &str, new: &str) -> Result<()> {
    if old == new {
      return Err(
        CoreError::Validation(format!("groups {old} and {new} are identical"))
          .into(),
      );
    }
    if !self.exists(Table::Groups, &[("group", &old)])? {
      return Err(CoreError::NotFound(format!("group {old}")).into());
    }
    if self.exists(Table::Groups, &[("group", &new)])? {
      return Err(CoreError::Duplicate(format!("group {new}")).into());
    }

    let tx = self.conn.transaction()?;
    tx.execute(
      "UPDATE \"Groups\" SET \"group\" = ?1 WHERE \"group\" = ?2",
      params![new, old],
    )?;
    tx.execute(
      "UPDATE \"Students\" SET \"group\" = ?1 WHERE \"group\" = ?2",
      params![new, old],
    )?;
    tx.execute(
      "UPDATE \"Journal\" SET \"group\" = ?1 WHERE \"group\" = ?2",
      params![new, old],
    )?;
    tx.commit()?;
    tracing::info!(%old, %new, "group renamed");
    Ok(())
  }

  /// Rename a student's identity fields, cascading into journal rows.
  pub fn rename_student(
    &mut self,
    old: &StudentRecord,
    new: &StudentRecord,
  ) -> Result<()> {
    if old == new {
      return Err(
        CoreError::Validation(format!("students {old} and {new} are identical"))
          .into(),
      );
    }
    if !self.student_exists(old)? {
      return Err(CoreError::NotFound(format!("student {old}")).into());
    }
    if self.student_exists(new)? {
      return Err(CoreError::Duplicate(format!("student {new}")).into());
    }

    let tx = self.conn.transaction()?;
    for table in ["Students", "Journal"] {
      tx.execute(
        &format!(
          "UPDATE \"{table}\"
           SET \"group\" = ?1, \"surname\" = ?2, \"name\" = ?3, \"patronymic\" = ?4
           WHERE \"group\" = ?5 AND \"surname\" = ?6
             AND \"name\" = ?7 AND \"patronymic\" = ?8"
        ),
        params![
          new.group,
          new.surname,
          new.name,
          new.patronymic,
          old.group,
          old.surname,
          old.name,
          old.patronymic,
        ],
      )?;
    }
    tx.commit()?;
    tracing::info!(%old, %new, "student renamed");
    Ok(())
  }

  /// Rename a lesson title, cascading into journal rows.
  pub fn rename_lesson(&mut self, old: &str, new: &str) -> Result<()> {
    if old == new {
      return Err(
        CoreError::Validation(format!("lessons {old} and {new} are identical"))
          .into(),
      );
    }
    if !self.exists(Table::Lessons, &[("lesson", &old)])? {
      return Err(CoreError::NotFound(format!("lesson {old}")).into());
    }
    if self.exists(Table::Lessons, &[("lesson", &new)])? {
      return Err(CoreError::Duplicate(format!("lesson {new}")).into());
    }

    let tx = self.conn.transaction()?;
    tx.execute(
      "UPDATE \"Lessons\" SET \"lesson\" = ?1 WHERE \"lesson\" = ?2",
      params![new, old],
    )?;
    tx.execute(
      "UPDATE \"Journal\" SET \"lesson\" = ?1 WHERE \"lesson\" = ?2",
      params![new, old],
    )?;
    tx.commit()?;
    tracing::info!(%old, %new, "lesson renamed");
    Ok(())
  }

  /// Rewrite a single journal row (the grid edit path — typically just the
  /// missed-hours cell).
  pub fn update_journal_row(
    &mut self,
    old: &JournalRecord,
    new: &JournalRecord,
  ) -> Result<()> {
    if old == new {
      return Err(
        CoreError::Validation("old and new journal rows are identical".into())
          .into(),
      );
    }
    if !self.journal_row_exists(old)? {
      return Err(CoreError::NotFound("journal row".into()).into());
    }
    if self.journal_row_exists(new)? {
      return Err(CoreError::Duplicate("journal row".into()).into());
    }

    self.conn.execute(
      "UPDATE \"Journal\"
       SET \"date\" = ?1, \"group\" = ?2, \"surname\" = ?3, \"name\" = ?4,
           \"patronymic\" = ?5, \"lesson\" = ?6, \"missed_hours\" = ?7
       WHERE \"date\" = ?8 AND \"group\" = ?9 AND \"surname\" = ?10
         AND \"name\" = ?11 AND \"patronymic\" = ?12 AND \"lesson\" = ?13
         AND \"missed_hours\" IS ?14",
      params![
        new.date,
        new.group,
        new.surname,
        new.name,
        new.patronymic,
        new.lesson,
        SqlHours(new.missed_hours),
        old.date,
        old.group,
        old.surname,
        old.name,
        old.patronymic,
        old.lesson,
        SqlHours(old.missed_hours),
      ],
    )?;
    Ok(())
  }

  // ── Deletes (with cascades) ───────────────────────────────────────────────

  /// Delete a class date and every journal row on it.
  pub fn delete_date(&mut self, year: i32, month: u32, day: u32) -> Result<()> {
    let date = compose_date(year, month, day)?;
    if !self.exists(Table::Dates, &[("date", &date)])? {
      return Err(CoreError::NotFound(format!("date {date}")).into());
    }
    let tx = self.conn.transaction()?;
    tx.execute("DELETE FROM \"Dates\" WHERE \"date\" = ?1", params![date])?;
    tx.execute("DELETE FROM \"Journal\" WHERE \"date\" = ?1", params![date])?;
    tx.commit()?;
    tracing::info!(%date, "date deleted");
    Ok(())
  }

  /// Delete a group, its students, and every journal row carrying it.
  pub fn delete_group(&mut self, name: &str) -> Result<()> {
    if !self.exists(Table::Groups, &[("group", &name)])? {
      return Err(CoreError::NotFound(format!("group {name}")).into());
    }
    let tx = self.conn.transaction()?;
    tx.execute("DELETE FROM \"Groups\" WHERE \"group\" = ?1", params![name])?;
    tx.execute("DELETE FROM \"Students\" WHERE \"group\" = ?1", params![name])?;
    tx.execute("DELETE FROM \"Journal\" WHERE \"group\" = ?1", params![name])?;
    tx.commit()?;
    tracing::info!(group = name, "group deleted");
    Ok(())
  }

  /// Delete a student and every journal row matching the 4-tuple.
  pub fn delete_student(&mut self, student: &StudentRecord) -> Result<()> {
    if !self.student_exists(student)? {
      return Err(CoreError::NotFound(format!("student {student}")).into());
    }
    let tx = self.conn.transaction()?;
    for table in ["Students", "Journal"] {
      tx.execute(
        &format!(
          "DELETE FROM \"{table}\"
           WHERE \"group\" = ?1 AND \"surname\" = ?2
             AND \"name\" = ?3 AND \"patronymic\" = ?4"
        ),
        params![student.group, student.surname, student.name, student.patronymic],
      )?;
    }
    tx.commit()?;
    tracing::info!(student = %student, "student deleted");
    Ok(())
  }

  /// Delete a lesson and every journal row carrying it.
  pub fn delete_lesson(&mut self, title: &str) -> Result<()> {
    if !self.exists(Table::Lessons, &[("lesson", &title)])? {
      return Err(CoreError::NotFound(format!("lesson {title}")).into());
    }
    let tx = self.conn.transaction()?;
    tx.execute("DELETE FROM \"Lessons\" WHERE \"lesson\" = ?1", params![title])?;
    tx.execute("DELETE FROM \"Journal\" WHERE \"lesson\" = ?1", params![title])?;
    tx.commit()?;
    tracing::info!(lesson = title, "lesson deleted");
    Ok(())
  }

  // ── Typed projections ─────────────────────────────────────────────────────

  pub fn group_names(&self) -> Result<Vec<String>> {
    let mut stmt = self
      .conn
      .prepare("SELECT DISTINCT \"group\" FROM \"Groups\"")?;
    let names = stmt
      .query_map([], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
  }

  pub fn students(&self) -> Result<Vec<StudentRecord>> {
    students_on(&self.conn)
  }

  pub fn lesson_titles(&self) -> Result<Vec<String>> {
    lesson_titles_on(&self.conn)
  }

  pub fn dates(&self) -> Result<Vec<String>> {
    dates_on(&self.conn)
  }

  /// The full ledger, ordered by date, group and student identity — the
  /// order the journal export uses.
  pub fn journal(&self) -> Result<Vec<JournalRecord>> {
    let mut stmt = self.conn.prepare(
      "SELECT DISTINCT \"date\", \"group\", \"surname\", \"name\",
              \"patronymic\", \"lesson\", \"missed_hours\"
       FROM \"Journal\"
       ORDER BY \"date\", \"group\", \"surname\", \"name\", \"patronymic\"",
    )?;
    let rows = stmt
      .query_map([], journal_from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
  }

  /// Journal rows for one group in one `YYYY-MM` month (the grid view).
  pub fn journal_slice(&self, month: &str, group: &str) -> Result<Vec<JournalRecord>> {
    let pattern = format!("{}%", escape_like(month));
    let mut stmt = self.conn.prepare(
      "SELECT \"date\", \"group\", \"surname\", \"name\",
              \"patronymic\", \"lesson\", \"missed_hours\"
       FROM \"Journal\"
       WHERE \"date\" LIKE ?1 ESCAPE '\\' AND \"group\" = ?2
       ORDER BY \"date\", \"surname\", \"name\", \"patronymic\", \"lesson\"",
    )?;
    let rows = stmt
      .query_map(params![pattern, group], journal_from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
  }

  /// All five collections in one bundle — the full-backup export shape.
  pub fn backup(&self) -> Result<Backup> {
    Ok(Backup {
      groups:   self.group_names()?,
      students: self.students()?,
      lessons:  self.lesson_titles()?,
      dates:    self.dates()?,
      journal:  self.journal()?,
    })
  }

  // ── Natural-key helpers ───────────────────────────────────────────────────

  pub fn student_exists(&self, s: &StudentRecord) -> Result<bool> {
    self.exists(Table::Students, &[
      ("group", &s.group),
      ("surname", &s.surname),
      ("name", &s.name),
      ("patronymic", &s.patronymic),
    ])
  }

  fn journal_row_exists(&self, r: &JournalRecord) -> Result<bool> {
    self.exists(Table::Journal, &[
      ("date", &r.date),
      ("group", &r.group),
      ("surname", &r.surname),
      ("name", &r.name),
      ("patronymic", &r.patronymic),
      ("lesson", &r.lesson),
      ("missed_hours", &SqlHours(r.missed_hours)),
    ])
  }

  // ── Demo data ─────────────────────────────────────────────────────────────

  /// Populate a small demo month: dates, lessons, groups, students and a
  /// randomized journal. Intended for the CLI `seed` command only.
  pub fn seed_demo(&mut self) -> Result<()> {
    use rand::Rng as _;

    let lessons = [
      "Численные методы",
      "Теория информации",
      "Алгоритмы и структуры данных",
      "Языки программирования",
      "Философия",
    ];
    let groups = ["10701123", "10701223"];
    let students = [
      ("10701123", "Антанович", "Дмитрий", "Сергеевич"),
      ("10701123", "Аронова", "Екатерина", "Александровна"),
      ("10701123", "Гайданович", "Максим", "Иванович"),
      ("10701223", "Дешко", "Никита", "Дмитриевич"),
      ("10701223", "Купреева", "Милана", "Кирилловна"),
      ("10701223", "Суббота", "Анна", "Михайловна"),
    ];

    let mut rng = rand::thread_rng();
    let tx = self.conn.transaction()?;

    for day in 1..=10u32 {
      tx.execute(
        "INSERT INTO \"Dates\" (\"date\") VALUES (?1)",
        params![format!("2007-09-{day:02}")],
      )?;
    }
    for lesson in lessons {
      tx.execute("INSERT INTO \"Lessons\" (\"lesson\") VALUES (?1)", params![lesson])?;
    }
    for group in groups {
      tx.execute("INSERT INTO \"Groups\" (\"group\") VALUES (?1)", params![group])?;
    }
    for (group, surname, name, patronymic) in students {
      tx.execute(
        "INSERT INTO \"Students\" (\"group\", \"surname\", \"name\", \"patronymic\")
         VALUES (?1, ?2, ?3, ?4)",
        params![group, surname, name, patronymic],
      )?;
    }
    for day in 1..=10u32 {
      let date = format!("2007-09-{day:02}");
      for (group, surname, name, patronymic) in students {
        for lesson in lessons {
          let hours = MissedHours::Hours(rng.gen_range(0..=2));
          insert_journal_row(&tx, &JournalRecord {
            date:         date.clone(),
            group:        group.to_owned(),
            surname:      surname.to_owned(),
            name:         name.to_owned(),
            patronymic:   patronymic.to_owned(),
            lesson:       lesson.to_owned(),
            missed_hours: hours,
          })?;
        }
      }
    }

    tx.commit()?;
    tracing::info!("demo data seeded");
    Ok(())
  }
}

// ─── Connection-level helpers ────────────────────────────────────────────────
//
// Free functions over `&Connection` so the same code runs both on the store
// connection and inside an open transaction (which derefs to `Connection`).

fn check_columns(table: Table, columns: &[&str]) -> Result<()> {
  for col in columns {
    if !table.columns().contains(col) {
      return Err(Error::UnknownColumn {
        table:  table.name(),
        column: (*col).to_owned(),
      });
    }
  }
  Ok(())
}

fn quote_list(columns: &[&str]) -> String {
  columns
    .iter()
    .map(|c| format!("\"{c}\""))
    .collect::<Vec<_>>()
    .join(", ")
}

fn push_order_by(
  sql: &mut String,
  table: Table,
  order_by: Option<&[&str]>,
) -> Result<()> {
  if let Some(cols) = order_by {
    check_columns(table, cols)?;
    sql.push_str(&format!(" ORDER BY {}", quote_list(cols)));
  }
  Ok(())
}

fn cells_from_row(row: &rusqlite::Row<'_>, width: usize) -> rusqlite::Result<Vec<Cell>> {
  (0..width).map(|i| row.get(i)).collect()
}

fn exists_on(
  conn: &Connection,
  table: Table,
  predicates: &[(&str, &dyn ToSql)],
) -> Result<bool> {
  if predicates.is_empty() {
    return Err(Error::EmptyPredicates);
  }
  let pred_cols: Vec<&str> = predicates.iter().map(|(c, _)| *c).collect();
  check_columns(table, &pred_cols)?;

  let mut sql = format!("SELECT COUNT(*) FROM \"{}\" WHERE ", table.name());
  for (i, col) in pred_cols.iter().enumerate() {
    if i > 0 {
      sql.push_str(" AND ");
    }
    sql.push_str(&format!("\"{col}\" IS ?{}", i + 1));
  }

  let values = predicates.iter().map(|(_, v)| *v);
  let count: i64 =
    conn.query_row(&sql, params_from_iter(values), |row| row.get(0))?;
  Ok(count > 0)
}

fn students_on(conn: &Connection) -> Result<Vec<StudentRecord>> {
  let mut stmt = conn.prepare(
    "SELECT DISTINCT \"group\", \"surname\", \"name\", \"patronymic\"
     FROM \"Students\"
     ORDER BY \"group\", \"surname\", \"name\", \"patronymic\"",
  )?;
  let rows = stmt
    .query_map([], student_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn lesson_titles_on(conn: &Connection) -> Result<Vec<String>> {
  let mut stmt = conn
    .prepare("SELECT DISTINCT \"lesson\" FROM \"Lessons\" ORDER BY \"lesson\"")?;
  let rows = stmt
    .query_map([], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn dates_on(conn: &Connection) -> Result<Vec<String>> {
  let mut stmt =
    conn.prepare("SELECT DISTINCT \"date\" FROM \"Dates\" ORDER BY \"date\"")?;
  let rows = stmt
    .query_map([], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn journal_triple_exists(
  conn: &Connection,
  date: &str,
  student: &StudentRecord,
  lesson: &str,
) -> Result<bool> {
  let count: i64 = conn.query_row(
    "SELECT COUNT(*) FROM \"Journal\"
     WHERE \"date\" = ?1 AND \"group\" = ?2 AND \"surname\" = ?3
       AND \"name\" = ?4 AND \"patronymic\" = ?5 AND \"lesson\" = ?6",
    params![
      date,
      student.group,
      student.surname,
      student.name,
      student.patronymic,
      lesson
    ],
    |row| row.get(0),
  )?;
  Ok(count > 0)
}

fn insert_journal_row(conn: &Connection, r: &JournalRecord) -> Result<()> {
  conn.execute(
    "INSERT INTO \"Journal\"
       (\"date\", \"group\", \"surname\", \"name\", \"patronymic\",
        \"lesson\", \"missed_hours\")
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    params![
      r.date,
      r.group,
      r.surname,
      r.name,
      r.patronymic,
      r.lesson,
      SqlHours(r.missed_hours)
    ],
  )?;
  Ok(())
}
