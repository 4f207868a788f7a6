//! Auto-detecting importer: classify a file, decode it, normalize whatever
//! shape came out into candidate records and merge them into the store.
//!
//! Merging is idempotent. Every insert goes through the store's duplicate
//! checks, so re-importing a file the ledger already contains is a no-op,
//! and a date import triggers the same journal cross-product as entering
//! the date by hand.

use std::{fmt, fs, path::Path};

use chrono::{Datelike, NaiveDate};
use rollcall_codec::{Document, FlatItem, XmlDocument, compact, json, native, xml};
use rollcall_core::StudentRecord;
use rollcall_store_sqlite::SqliteStore;
use tracing::{info, warn};

use crate::{
  Error, Result,
  detect::{Format, LARGE_FILE_BYTES},
};

pub struct Importer<'a> {
  store: &'a mut SqliteStore,
}

/// The importer either merged records or refused a large file pending
/// confirmation.
#[derive(Debug, PartialEq, Eq)]
pub enum ImportOutcome {
  /// The file exceeds the size gate; nothing was read. Retry with
  /// `allow_large` to proceed.
  LargeFile(u64),
  Imported(ImportReport),
}

/// How many records of each kind were newly merged (duplicates excluded).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
  pub groups:   usize,
  pub students: usize,
  pub lessons:  usize,
  pub dates:    usize,
}

impl ImportReport {
  pub fn is_empty(&self) -> bool {
    self.groups == 0
      && self.students == 0
      && self.lessons == 0
      && self.dates == 0
  }
}

impl fmt::Display for ImportReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_empty() {
      return write!(f, "Nothing imported.");
    }
    let mut lines = Vec::new();
    for (count, noun) in [
      (self.groups, "group(s)"),
      (self.students, "student(s)"),
      (self.lessons, "lesson(s)"),
      (self.dates, "date(s)"),
    ] {
      if count > 0 {
        lines.push(format!("Imported {count} {noun}"));
      }
    }
    write!(f, "{}", lines.join("\n"))
  }
}

/// A record extracted from a decoded file, not yet merged.
enum Candidate {
  Group(String),
  Student(StudentRecord),
  Lesson(String),
  Date(String),
}

impl<'a> Importer<'a> {
  pub fn new(store: &'a mut SqliteStore) -> Self {
    Self { store }
  }

  /// Import `path`, detecting the format from the extension or, failing
  /// that, the file's leading bytes.
  pub fn auto_import(
    &mut self,
    path: &Path,
    allow_large: bool,
  ) -> Result<ImportOutcome> {
    let size = fs::metadata(path)?.len();
    if size > LARGE_FILE_BYTES && !allow_large {
      return Ok(ImportOutcome::LargeFile(size));
    }

    let bytes = fs::read(path)?;
    let format = Format::from_path(path)
      .or_else(|| Format::sniff(&bytes))
      .ok_or(Error::UnknownFormat)?;
    info!(path = %path.display(), ?format, size, "importing");

    let candidates = match format {
      Format::Json => {
        let text = String::from_utf8(bytes)
          .map_err(|_| Error::Malformed("not valid UTF-8".into()))?;
        normalize_document(json::decode(&text)?)
      }
      Format::Xml => normalize_tree(xml::decode(&bytes)?),
      Format::Native => normalize_bundle(native::decode(&bytes)?),
      Format::Compact => normalize_document(compact::decode(&bytes)?),
    };

    Ok(ImportOutcome::Imported(self.merge(candidates)?))
  }

  fn merge(&mut self, candidates: Vec<Candidate>) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    for candidate in candidates {
      match candidate {
        Candidate::Group(name) => {
          if self.store.insert_group(&name)? {
            report.groups += 1;
          }
        }
        Candidate::Student(student) => {
          if self.store.insert_student(&student)? {
            report.students += 1;
          }
        }
        Candidate::Lesson(title) => {
          if self.store.insert_lesson(&title)? {
            report.lessons += 1;
          }
        }
        Candidate::Date(text) => {
          let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") else {
            warn!(date = %text, "skipping unparseable date");
            continue;
          };
          if self.store.insert_date(date.year(), date.month(), date.day())? {
            report.dates += 1;
          }
        }
      }
    }
    Ok(report)
  }
}

// ─── Normalizers ─────────────────────────────────────────────────────────────

/// A structured document is either a full bundle or a flat list of items.
fn normalize_document(document: Document) -> Vec<Candidate> {
  match document {
    Document::Bundle(backup) => normalize_bundle(backup),
    Document::Flat(items) => items
      .into_iter()
      .map(|item| match item {
        FlatItem::Name(name) => Candidate::Group(name),
        FlatItem::Student(student) => Candidate::Student(student),
      })
      .collect(),
  }
}

/// Bundles merge dimensions in dependency order so the implicit journal
/// cross-product sees every student and lesson before the first date
/// lands. Journal rows themselves are never merged; the cascade
/// regenerates them with unmarked hours.
fn normalize_bundle(backup: rollcall_core::Backup) -> Vec<Candidate> {
  let mut out = Vec::new();
  out.extend(backup.groups.into_iter().map(Candidate::Group));
  out.extend(backup.students.into_iter().map(Candidate::Student));
  out.extend(backup.lessons.into_iter().map(Candidate::Lesson));
  out.extend(backup.dates.into_iter().map(Candidate::Date));
  out
}

/// Interpret the shallow markup tree. Foreign documents spell things in
/// various ways: a group can be the item's text, a `<Name>` child, or a
/// `name` attribute; a student needs all four of its child fields.
fn normalize_tree(doc: XmlDocument) -> Vec<Candidate> {
  let mut out = Vec::new();
  for item in &doc.items {
    let tag = item.tag.to_ascii_lowercase();
    match tag.as_str() {
      "group" => {
        let name = item
          .child_text("name")
          .or_else(|| item.attr("name"))
          .unwrap_or(&item.text);
        if !name.is_empty() {
          out.push(Candidate::Group(name.to_owned()));
        }
      }
      "student" => {
        let fields = (
          item.child_text("group"),
          item.child_text("surname"),
          item.child_text("name"),
          item.child_text("patronymic"),
        );
        if let (Some(group), Some(surname), Some(name), Some(patronymic)) =
          fields
        {
          out.push(Candidate::Student(StudentRecord {
            group:      group.to_owned(),
            surname:    surname.to_owned(),
            name:       name.to_owned(),
            patronymic: patronymic.to_owned(),
          }));
        } else {
          warn!(tag = %item.tag, "skipping student item with missing fields");
        }
      }
      "lesson" => {
        let title = item.child_text("name").unwrap_or(&item.text);
        if !title.is_empty() {
          out.push(Candidate::Lesson(title.to_owned()));
        }
      }
      "date" => {
        let date = item.child_text("value").unwrap_or(&item.text);
        if !date.is_empty() {
          out.push(Candidate::Date(date.to_owned()));
        }
      }
      other => warn!(tag = other, "skipping unrecognized markup item"),
    }
  }
  out
}
