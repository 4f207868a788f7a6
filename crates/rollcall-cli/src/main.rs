//! rollcall command-line binary.
//!
//! Reads `rollcall.toml` (or the path specified with `--config`), opens the
//! SQLite attendance store, and runs one subcommand against it.

use std::{path::PathBuf, str::FromStr};

use anyhow::Context as _;
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use rollcall_core::{MissedHours, StudentRecord};
use rollcall_store_sqlite::SqliteStore;
use rollcall_transfer::{Exporter, ImportOutcome, Importer};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Attendance ledger for student groups")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "rollcall.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct AppConfig {
  /// Path of the SQLite database file.
  store_path: PathBuf,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self { store_path: PathBuf::from("rollcall.db") }
  }
}

#[derive(Subcommand)]
enum Command {
  /// Add a record; dates and students fan out into the journal.
  Add {
    #[command(subcommand)]
    entity: Entity,
  },
  /// Rename a record, cascading through dependent journal rows.
  Rename {
    #[command(subcommand)]
    entity: RenameEntity,
  },
  /// Delete a record and every journal row that references it.
  Delete {
    #[command(subcommand)]
    entity: Entity,
  },
  /// Print one of the store's collections.
  List { collection: Collection },
  /// Print the journal for one month and group.
  Journal {
    /// Month prefix, e.g. `2024-01`.
    month: String,
    group: String,
  },
  /// Mark missed hours on one journal row.
  SetHours {
    date:    String,
    group:   String,
    surname: String,
    name:    String,
    patronymic: String,
    lesson:  String,
    /// `0`, `1`, `2` or `-` for not marked.
    hours:   String,
  },
  /// Import records from a file, auto-detecting its format.
  Import {
    path: PathBuf,
    /// Proceed even if the file exceeds the size gate.
    #[arg(long)]
    allow_large: bool,
  },
  /// Export a projection of the store to a file.
  Export {
    target: ExportTarget,
    path:   PathBuf,
  },
  /// Fill the store with demonstration data.
  Seed,
  /// Erase every record.
  Clear,
}

#[derive(Subcommand)]
enum Entity {
  Group { name: String },
  Student {
    group:      String,
    surname:    String,
    name:       String,
    patronymic: String,
  },
  Lesson { title: String },
  /// A class date in `YYYY-MM-DD` form.
  Date { date: String },
}

#[derive(Subcommand)]
enum RenameEntity {
  Group { old: String, new: String },
  Student {
    old_group:      String,
    old_surname:    String,
    old_name:       String,
    old_patronymic: String,
    new_group:      String,
    new_surname:    String,
    new_name:       String,
    new_patronymic: String,
  },
  Lesson { old: String, new: String },
  Date { old: String, new: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Collection {
  Groups,
  Students,
  Lessons,
  Dates,
  Journal,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportTarget {
  /// Group list as structured text.
  GroupsJson,
  /// Group list as markup.
  GroupsXml,
  /// Group list as compact binary.
  GroupsCompact,
  /// Student list as markup.
  StudentsXml,
  /// Full journal as markup.
  JournalXml,
  /// Full-ledger binary backup.
  Backup,
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ROLLCALL"))
    .build()
    .context("failed to read config file")?;
  let app_cfg: AppConfig = settings
    .try_deserialize()
    .context("failed to deserialise AppConfig")?;

  let mut store = SqliteStore::open(&app_cfg.store_path)
    .with_context(|| format!("failed to open store at {:?}", app_cfg.store_path))?;

  match cli.command {
    Command::Add { entity } => match entity {
      Entity::Group { name } => {
        report_insert(store.insert_group(&name)?, "group", &name);
      }
      Entity::Student { group, surname, name, patronymic } => {
        let student = StudentRecord { group, surname, name, patronymic };
        let label = student.to_string();
        report_insert(store.insert_student(&student)?, "student", &label);
      }
      Entity::Lesson { title } => {
        report_insert(store.insert_lesson(&title)?, "lesson", &title);
      }
      Entity::Date { date } => {
        let (y, m, d) = split_date(&date)?;
        report_insert(store.insert_date(y, m, d)?, "date", &date);
      }
    },

    Command::Rename { entity } => match entity {
      RenameEntity::Group { old, new } => {
        store.rename_group(&old, &new)?;
        println!("Renamed group {old} to {new}");
      }
      RenameEntity::Student {
        old_group,
        old_surname,
        old_name,
        old_patronymic,
        new_group,
        new_surname,
        new_name,
        new_patronymic,
      } => {
        let old = StudentRecord {
          group:      old_group,
          surname:    old_surname,
          name:       old_name,
          patronymic: old_patronymic,
        };
        let new = StudentRecord {
          group:      new_group,
          surname:    new_surname,
          name:       new_name,
          patronymic: new_patronymic,
        };
        store.rename_student(&old, &new)?;
        println!("Renamed student {old} to {new}");
      }
      RenameEntity::Lesson { old, new } => {
        store.rename_lesson(&old, &new)?;
        println!("Renamed lesson {old} to {new}");
      }
      RenameEntity::Date { old, new } => {
        store.rename_date(split_date(&old)?, split_date(&new)?)?;
        println!("Renamed date {old} to {new}");
      }
    },

    Command::Delete { entity } => match entity {
      Entity::Group { name } => {
        store.delete_group(&name)?;
        println!("Deleted group {name}");
      }
      Entity::Student { group, surname, name, patronymic } => {
        let student = StudentRecord { group, surname, name, patronymic };
        store.delete_student(&student)?;
        println!("Deleted student {student}");
      }
      Entity::Lesson { title } => {
        store.delete_lesson(&title)?;
        println!("Deleted lesson {title}");
      }
      Entity::Date { date } => {
        let (y, m, d) = split_date(&date)?;
        store.delete_date(y, m, d)?;
        println!("Deleted date {date}");
      }
    },

    Command::List { collection } => match collection {
      Collection::Groups => {
        for name in store.group_names()? {
          println!("{name}");
        }
      }
      Collection::Students => {
        for s in store.students()? {
          println!("{s}");
        }
      }
      Collection::Lessons => {
        for title in store.lesson_titles()? {
          println!("{title}");
        }
      }
      Collection::Dates => {
        for date in store.dates()? {
          println!("{date}");
        }
      }
      Collection::Journal => print_journal(&store.journal()?),
    },

    Command::Journal { month, group } => {
      print_journal(&store.journal_slice(&month, &group)?);
    }

    Command::SetHours {
      date,
      group,
      surname,
      name,
      patronymic,
      lesson,
      hours,
    } => {
      let hours =
        MissedHours::from_str(&hours).context("invalid missed-hours value")?;
      let journal = store.journal()?;
      let old = journal
        .into_iter()
        .find(|r| {
          r.date == date
            && r.group == group
            && r.surname == surname
            && r.name == name
            && r.patronymic == patronymic
            && r.lesson == lesson
        })
        .context("journal row not found")?;
      let mut new = old.clone();
      new.missed_hours = hours;
      store.update_journal_row(&old, &new)?;
      println!("Marked {hours} missed hour(s)");
    }

    Command::Import { path, allow_large } => {
      let mut importer = Importer::new(&mut store);
      match importer.auto_import(&path, allow_large)? {
        ImportOutcome::LargeFile(size) => {
          let mib = size as f64 / (1024.0 * 1024.0);
          println!(
            "{} is {mib:.1} MiB; rerun with --allow-large to import it",
            path.display()
          );
        }
        ImportOutcome::Imported(report) => println!("{report}"),
      }
    }

    Command::Export { target, path } => {
      let exporter = Exporter::new(&store);
      let message = match target {
        ExportTarget::GroupsJson => exporter.export_groups_json(&path)?,
        ExportTarget::GroupsXml => exporter.export_groups_xml(&path)?,
        ExportTarget::GroupsCompact => exporter.export_groups_compact(&path)?,
        ExportTarget::StudentsXml => exporter.export_students_xml(&path)?,
        ExportTarget::JournalXml => exporter.export_journal_xml(&path)?,
        ExportTarget::Backup => exporter.export_backup_native(&path)?,
      };
      println!("{message}");
    }

    Command::Seed => {
      store.seed_demo()?;
      println!("Seeded demonstration data");
    }

    Command::Clear => {
      store.clear()?;
      println!("Store cleared");
    }
  }

  Ok(())
}

fn split_date(s: &str) -> anyhow::Result<(i32, u32, u32)> {
  let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .with_context(|| format!("invalid date {s:?}, expected YYYY-MM-DD"))?;
  Ok((date.year(), date.month(), date.day()))
}

fn report_insert(inserted: bool, kind: &str, label: &str) {
  if inserted {
    println!("Added {kind} {label}");
  } else {
    println!("The {kind} {label} already exists");
  }
}

fn print_journal(records: &[rollcall_core::JournalRecord]) {
  for r in records {
    println!(
      "{}  {}  {} {} {}  {}  {}",
      r.date, r.group, r.surname, r.name, r.patronymic, r.lesson,
      r.missed_hours
    );
  }
}
