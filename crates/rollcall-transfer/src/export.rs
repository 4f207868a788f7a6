//! Exporter: pull projections from the store, encode them and write the
//! result to disk. Every operation returns a short human-readable summary
//! for the caller to display.

use std::{fs, path::Path};

use chrono::Utc;
use rollcall_codec::{compact, json, native, xml};
use rollcall_store_sqlite::SqliteStore;
use tracing::info;

use crate::Result;

pub struct Exporter<'a> {
  store: &'a SqliteStore,
}

impl<'a> Exporter<'a> {
  pub fn new(store: &'a SqliteStore) -> Self {
    Self { store }
  }

  pub fn export_groups_json(&self, path: &Path) -> Result<String> {
    let groups = self.store.group_names()?;
    let count = groups.len();
    fs::write(path, json::encode_names(&groups)?)?;
    info!(path = %path.display(), count, "exported groups as json");
    Ok(format!("Exported {count} group(s) to {}", path.display()))
  }

  pub fn export_groups_xml(&self, path: &Path) -> Result<String> {
    let groups = self.store.group_names()?;
    let count = groups.len();
    fs::write(path, xml::encode_groups(&groups, Utc::now()))?;
    info!(path = %path.display(), count, "exported groups as xml");
    Ok(format!("Exported {count} group(s) to {}", path.display()))
  }

  pub fn export_students_xml(&self, path: &Path) -> Result<String> {
    let students = self.store.students()?;
    let count = students.len();
    fs::write(path, xml::encode_students(&students, Utc::now()))?;
    info!(path = %path.display(), count, "exported students as xml");
    Ok(format!("Exported {count} student(s) to {}", path.display()))
  }

  pub fn export_journal_xml(&self, path: &Path) -> Result<String> {
    let journal = self.store.journal()?;
    let count = journal.len();
    fs::write(path, xml::encode_journal(&journal, Utc::now()))?;
    info!(path = %path.display(), count, "exported journal as xml");
    Ok(format!(
      "Exported {count} journal record(s) to {}",
      path.display()
    ))
  }

  /// Full-ledger binary backup, journal included.
  pub fn export_backup_native(&self, path: &Path) -> Result<String> {
    let backup = self.store.backup()?;
    let bytes = native::encode(&backup)?;
    let kib = bytes.len() as f64 / 1024.0;
    fs::write(path, bytes)?;
    info!(path = %path.display(), "exported native backup");
    Ok(format!("Backup written to {} ({kib:.1} KiB)", path.display()))
  }

  /// Compact binary export of the group list. The summary reports how much
  /// smaller the payload is than the equivalent structured text, measured
  /// against a sibling `.json` file when one exists and against a fresh
  /// encoding otherwise.
  pub fn export_groups_compact(&self, path: &Path) -> Result<String> {
    let groups = self.store.group_names()?;
    let count = groups.len();
    let bytes = compact::encode_names(&groups)?;

    let sibling = path.with_extension("json");
    let text_len = match fs::metadata(&sibling) {
      Ok(meta) => meta.len() as usize,
      Err(_) => json::encode_names(&groups)?.len(),
    };

    fs::write(path, &bytes)?;
    info!(path = %path.display(), count, "exported groups as compact binary");

    let saved = if text_len > 0 {
      100.0 - (bytes.len() as f64 / text_len as f64 * 100.0)
    } else {
      0.0
    };
    Ok(format!(
      "Exported {count} group(s) to {} ({} bytes, {saved:.0}% smaller than text)",
      path.display(),
      bytes.len()
    ))
  }
}
