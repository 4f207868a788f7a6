//! The markup codec.
//!
//! Encoding uses `quick-xml`'s writer API with two-space indentation, so
//! output is deterministic. Decoding is intentionally shallow and generic:
//! it produces a `{root_tag, attributes, items[]}` tree rather than typed
//! records — the importer's normalizers interpret the tree, which lets the
//! merge tolerate foreign spellings (`group` vs `Group`, text content vs a
//! `name` attribute).

use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::{
  Reader, Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use rollcall_core::{JournalRecord, StudentRecord};

use crate::{Error, Result};

// ─── Generic decoded tree ────────────────────────────────────────────────────

/// Shallow generic view of a markup document: the root element, its direct
/// children ("items") and their direct children. Anything deeper is
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
  pub root_tag:   String,
  pub attributes: Vec<(String, String)>,
  pub items:      Vec<XmlItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlItem {
  pub tag:      String,
  pub attrs:    Vec<(String, String)>,
  pub text:     String,
  pub children: Vec<XmlChild>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlChild {
  pub tag:  String,
  pub text: String,
}

impl XmlItem {
  /// Look up a direct child's text by case-insensitive tag name.
  pub fn child_text(&self, tag: &str) -> Option<&str> {
    self
      .children
      .iter()
      .find(|c| c.tag.eq_ignore_ascii_case(tag))
      .map(|c| c.text.as_str())
  }

  /// Look up an attribute value by case-insensitive name.
  pub fn attr(&self, name: &str) -> Option<&str> {
    self
      .attrs
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

// ─── Encoding ────────────────────────────────────────────────────────────────

/// `<Groups exported=".." count=".."><Group id="1"><Name>..</Name></Group>..`
pub fn encode_groups(groups: &[String], exported: DateTime<Utc>) -> String {
  let mut w = writer();
  write_root(&mut w, "Groups", exported, groups.len());
  for (i, name) in groups.iter().enumerate() {
    let mut elem = BytesStart::new("Group");
    elem.push_attribute(("id", (i + 1).to_string().as_str()));
    w.write_event(Event::Start(elem)).unwrap();
    write_text_elem(&mut w, "Name", name);
    write_end(&mut w, "Group");
  }
  finish(w, "Groups")
}

/// `<Students ..><Student id="1"><Group>..</Group><Surname>..`
pub fn encode_students(
  students: &[StudentRecord],
  exported: DateTime<Utc>,
) -> String {
  let mut w = writer();
  write_root(&mut w, "Students", exported, students.len());
  for (i, s) in students.iter().enumerate() {
    let mut elem = BytesStart::new("Student");
    elem.push_attribute(("id", (i + 1).to_string().as_str()));
    w.write_event(Event::Start(elem)).unwrap();
    write_text_elem(&mut w, "Group", &s.group);
    write_text_elem(&mut w, "Surname", &s.surname);
    write_text_elem(&mut w, "Name", &s.name);
    write_text_elem(&mut w, "Patronymic", &s.patronymic);
    write_end(&mut w, "Student");
  }
  finish(w, "Students")
}

/// `<AttendanceJournal ..><Record id="1"><Date>..</Date>..<MissedHours>..`
pub fn encode_journal(
  records: &[JournalRecord],
  exported: DateTime<Utc>,
) -> String {
  let mut w = writer();
  write_root(&mut w, "AttendanceJournal", exported, records.len());
  for (i, r) in records.iter().enumerate() {
    let mut elem = BytesStart::new("Record");
    elem.push_attribute(("id", (i + 1).to_string().as_str()));
    w.write_event(Event::Start(elem)).unwrap();
    write_text_elem(&mut w, "Date", &r.date);
    write_text_elem(&mut w, "Group", &r.group);
    write_text_elem(&mut w, "Surname", &r.surname);
    write_text_elem(&mut w, "Name", &r.name);
    write_text_elem(&mut w, "Patronymic", &r.patronymic);
    write_text_elem(&mut w, "Lesson", &r.lesson);
    write_text_elem(&mut w, "MissedHours", &r.missed_hours.to_string());
    write_end(&mut w, "Record");
  }
  finish(w, "AttendanceJournal")
}

// ─── Writer helpers ──────────────────────────────────────────────────────────

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn writer() -> XmlWriter {
  Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2)
}

fn write_root(w: &mut XmlWriter, tag: &str, exported: DateTime<Utc>, count: usize) {
  w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    .unwrap();
  let mut root = BytesStart::new(tag);
  root.push_attribute(("exported", exported.to_rfc3339().as_str()));
  root.push_attribute(("count", count.to_string().as_str()));
  w.write_event(Event::Start(root)).unwrap();
}

fn write_end(w: &mut XmlWriter, tag: &str) {
  w.write_event(Event::End(BytesEnd::new(tag))).unwrap();
}

fn write_text_elem(w: &mut XmlWriter, tag: &str, text: &str) {
  w.write_event(Event::Start(BytesStart::new(tag))).unwrap();
  w.write_event(Event::Text(BytesText::new(text))).unwrap();
  write_end(w, tag);
}

// Writes to an in-memory cursor are infallible, and the writer only ever
// emits UTF-8.
fn finish(mut w: XmlWriter, root_tag: &str) -> String {
  write_end(&mut w, root_tag);
  String::from_utf8(w.into_inner().into_inner()).unwrap()
}

// ─── Decoding ────────────────────────────────────────────────────────────────

/// Parse any markup document into the shallow generic tree.
pub fn decode(xml: &[u8]) -> Result<XmlDocument> {
  let mut reader = Reader::from_reader(xml);
  reader.config_mut().trim_text(true);

  let mut doc: Option<XmlDocument> = None;
  let mut item: Option<XmlItem> = None;
  let mut child: Option<XmlChild> = None;
  let mut depth = 0usize;
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf) {
      Ok(Event::Start(ref e)) => {
        match depth {
          0 => {
            doc = Some(XmlDocument {
              root_tag:   tag_of(e),
              attributes: attrs_of(e)?,
              items:      Vec::new(),
            })
          }
          1 => {
            item = Some(XmlItem {
              tag:      tag_of(e),
              attrs:    attrs_of(e)?,
              text:     String::new(),
              children: Vec::new(),
            })
          }
          2 => {
            child = Some(XmlChild { tag: tag_of(e), text: String::new() })
          }
          _ => {} // deeper levels ignored by the shallow decode
        }
        depth += 1;
      }
      Ok(Event::Empty(ref e)) => match depth {
        1 => {
          if let Some(doc) = doc.as_mut() {
            doc.items.push(XmlItem {
              tag:      tag_of(e),
              attrs:    attrs_of(e)?,
              text:     String::new(),
              children: Vec::new(),
            });
          }
        }
        2 => {
          if let Some(item) = item.as_mut() {
            item.children.push(XmlChild { tag: tag_of(e), text: String::new() });
          }
        }
        _ => {}
      },
      Ok(Event::Text(ref e)) => {
        let text = e
          .unescape()
          .map_err(|err| Error::Xml(err.to_string()))?
          .into_owned();
        match depth {
          2 => {
            if let Some(item) = item.as_mut() {
              item.text = text;
            }
          }
          3 => {
            if let Some(child) = child.as_mut() {
              child.text = text;
            }
          }
          _ => {}
        }
      }
      Ok(Event::End(_)) => {
        depth = depth.saturating_sub(1);
        match depth {
          2 => {
            if let (Some(item), Some(closed)) = (item.as_mut(), child.take()) {
              item.children.push(closed);
            }
          }
          1 => {
            if let (Some(doc), Some(closed)) = (doc.as_mut(), item.take()) {
              doc.items.push(closed);
            }
          }
          _ => {}
        }
      }
      Ok(Event::Eof) => break,
      Err(e) => return Err(Error::Xml(e.to_string())),
      _ => {}
    }
    buf.clear();
  }

  doc.ok_or_else(|| Error::Xml("document has no root element".into()))
}

fn tag_of(e: &BytesStart<'_>) -> String {
  String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attrs_of(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
  let mut attrs = Vec::new();
  for attr in e.attributes() {
    let attr = attr.map_err(|err| Error::Xml(err.to_string()))?;
    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
    let value = attr
      .unescape_value()
      .map_err(|err| Error::Xml(err.to_string()))?
      .into_owned();
    attrs.push((key, value));
  }
  Ok(attrs)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
