use std::fs;

use rollcall_core::{MissedHours, StudentRecord};
use rollcall_store_sqlite::SqliteStore;
use tempfile::TempDir;

use super::*;

fn store() -> SqliteStore {
  SqliteStore::open_in_memory().unwrap()
}

fn populated() -> SqliteStore {
  let mut store = store();
  store.insert_group("G1").unwrap();
  store.insert_group("G2").unwrap();
  store.insert_lesson("Math").unwrap();
  store
    .insert_student(&StudentRecord {
      group:      "G1".into(),
      surname:    "Ivanov".into(),
      name:       "Ivan".into(),
      patronymic: "Ivanovich".into(),
    })
    .unwrap();
  store.insert_date(2024, 1, 15).unwrap();
  store
}

#[test]
fn exported_groups_json_imports_into_a_fresh_store() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("groups.json");

  let source = populated();
  let message = Exporter::new(&source).export_groups_json(&path).unwrap();
  assert!(message.contains("2 group(s)"));

  let mut target = store();
  let outcome = Importer::new(&mut target).auto_import(&path, false).unwrap();
  let ImportOutcome::Imported(report) = outcome else {
    panic!("expected an import, got {outcome:?}");
  };
  assert_eq!(report.groups, 2);
  assert_eq!(report.students, 0);
  assert_eq!(target.group_names().unwrap(), vec!["G1", "G2"]);
}

#[test]
fn reimporting_the_same_file_merges_nothing() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("groups.json");

  let source = populated();
  Exporter::new(&source).export_groups_json(&path).unwrap();

  let mut target = store();
  let mut importer = Importer::new(&mut target);
  importer.auto_import(&path, false).unwrap();
  let ImportOutcome::Imported(report) =
    importer.auto_import(&path, false).unwrap()
  else {
    panic!("expected an import");
  };
  assert!(report.is_empty());
  assert_eq!(report.to_string(), "Nothing imported.");
}

#[test]
fn students_survive_a_markup_round_trip() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("students.xml");

  let source = populated();
  Exporter::new(&source).export_students_xml(&path).unwrap();

  let mut target = store();
  target.insert_group("G1").unwrap();
  let ImportOutcome::Imported(report) =
    Importer::new(&mut target).auto_import(&path, false).unwrap()
  else {
    panic!("expected an import");
  };
  assert_eq!(report.students, 1);
  assert_eq!(target.students().unwrap(), source.students().unwrap());
}

#[test]
fn native_backup_restores_every_dimension() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("ledger.pkl");

  let source = populated();
  let message = Exporter::new(&source).export_backup_native(&path).unwrap();
  assert!(message.contains("KiB"));

  let mut target = store();
  let ImportOutcome::Imported(report) =
    Importer::new(&mut target).auto_import(&path, false).unwrap()
  else {
    panic!("expected an import");
  };
  assert_eq!(report.groups, 2);
  assert_eq!(report.students, 1);
  assert_eq!(report.lessons, 1);
  assert_eq!(report.dates, 1);

  assert_eq!(target.group_names().unwrap(), source.group_names().unwrap());
  assert_eq!(target.dates().unwrap(), vec!["2024-01-15"]);

  // Journal rows are not copied; the date insert regenerates them through
  // the cross-product, with hours unmarked.
  let journal = target.journal().unwrap();
  assert_eq!(journal.len(), 1);
  assert_eq!(journal[0].missed_hours, MissedHours::NotMarked);
}

#[test]
fn compact_export_imports_and_reports_savings() {
  let dir = TempDir::new().unwrap();
  let json_path = dir.path().join("groups.json");
  let mpk_path = dir.path().join("groups.mpk");

  let source = populated();
  let exporter = Exporter::new(&source);
  exporter.export_groups_json(&json_path).unwrap();
  let message = exporter.export_groups_compact(&mpk_path).unwrap();
  assert!(message.contains("smaller than text"));

  let mut target = store();
  let ImportOutcome::Imported(report) = Importer::new(&mut target)
    .auto_import(&mpk_path, false)
    .unwrap()
  else {
    panic!("expected an import");
  };
  assert_eq!(report.groups, 2);
}

#[test]
fn unknown_format_is_an_error() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("notes.txt");
  fs::write(&path, "just some text").unwrap();

  let mut target = store();
  let err = Importer::new(&mut target).auto_import(&path, false).unwrap_err();
  assert!(matches!(err, Error::UnknownFormat));
}

#[test]
fn extensionless_files_are_sniffed() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("payload");
  fs::write(&path, "[\"G9\"]").unwrap();

  let mut target = store();
  let ImportOutcome::Imported(report) =
    Importer::new(&mut target).auto_import(&path, false).unwrap()
  else {
    panic!("expected an import");
  };
  assert_eq!(report.groups, 1);
  assert_eq!(target.group_names().unwrap(), vec!["G9"]);
}

#[test]
fn groups_only_bundle_merges_the_present_collection() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("partial.json");
  fs::write(&path, r#"{"groups": ["G1", "G2"]}"#).unwrap();

  let mut target = store();
  let ImportOutcome::Imported(report) =
    Importer::new(&mut target).auto_import(&path, false).unwrap()
  else {
    panic!("expected an import");
  };
  assert_eq!(report.groups, 2);
  assert_eq!(report.students, 0);
  assert_eq!(target.group_names().unwrap(), vec!["G1", "G2"]);
  assert!(target.dates().unwrap().is_empty());
}

#[test]
fn oversized_files_are_gated() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("big.json");

  // A valid payload padded past the gate with trailing whitespace.
  let mut body = String::from("[\"G1\"]");
  body.push_str(&" ".repeat(11 * 1024 * 1024));
  fs::write(&path, &body).unwrap();

  let mut target = store();

  let outcome =
    Importer::new(&mut target).auto_import(&path, false).unwrap();
  assert_eq!(outcome, ImportOutcome::LargeFile(body.len() as u64));
  assert!(target.group_names().unwrap().is_empty());

  // The confirmed retry proceeds to decode.
  let ImportOutcome::Imported(report) =
    Importer::new(&mut target).auto_import(&path, true).unwrap()
  else {
    panic!("expected an import");
  };
  assert_eq!(report.groups, 1);
}

#[test]
fn corrupt_structured_text_is_a_codec_error() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("broken.json");
  fs::write(&path, "{\"groups\": [unterminated").unwrap();

  let mut target = store();
  let err = Importer::new(&mut target).auto_import(&path, false).unwrap_err();
  assert!(matches!(err, Error::Codec(_)));
}

#[test]
fn foreign_compact_payload_imports() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("foreign.msgpack");
  let payload = rmp_serde::to_vec(&vec!["A1".to_string(), "A2".to_string()])
    .unwrap();
  fs::write(&path, payload).unwrap();

  let mut target = store();
  let ImportOutcome::Imported(report) =
    Importer::new(&mut target).auto_import(&path, false).unwrap()
  else {
    panic!("expected an import");
  };
  assert_eq!(report.groups, 2);
}

#[test]
fn journal_export_carries_marked_hours() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("journal.xml");

  let mut source = populated();
  let old = source.journal().unwrap().remove(0);
  let mut updated = old.clone();
  updated.missed_hours = MissedHours::hours(2).unwrap();
  source.update_journal_row(&old, &updated).unwrap();

  let message = Exporter::new(&source).export_journal_xml(&path).unwrap();
  assert!(message.contains("1 journal record(s)"));

  let xml = fs::read_to_string(&path).unwrap();
  assert!(xml.contains("<MissedHours>2</MissedHours>"));
}
