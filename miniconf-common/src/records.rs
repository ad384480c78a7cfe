//! Record access and normalization
//!
//! Entities arrive as loosely-shaped JSON objects. The helpers here pull the
//! required fields out of them (failing on absence) and build the uniform
//! paper and workshop shapes consumed by the index and the pages.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A single entity as loaded from a dataset
pub type Record = Map<String, Value>;

/// Best-effort label for error messages: the record's UID if it has one
fn describe(record: &Record) -> String {
    match record.get("UID") {
        Some(Value::String(uid)) => format!("record '{}'", uid),
        Some(other) => format!("record {}", other),
        None => "record without UID".to_string(),
    }
}

/// Fetch a required field
pub fn require<'a>(record: &'a Record, field: &str) -> Result<&'a Value> {
    record
        .get(field)
        .ok_or_else(|| Error::missing_field(describe(record), field))
}

/// Fetch a required field as text
///
/// Strings are returned as-is and numbers by their decimal form, so numeric
/// UIDs in hand-written JSON still index.
pub fn require_text(record: &Record, field: &str) -> Result<String> {
    match require(record, field)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::invalid_field(
            describe(record),
            field,
            format!("expected string, found {}", type_name(other)),
        )),
    }
}

/// Fetch a required field as a copy of its value, whatever its type
pub fn require_value(record: &Record, field: &str) -> Result<Value> {
    require(record, field).cloned()
}

/// Fetch an optional field, defaulting to the empty string
pub fn optional_value(record: &Record, field: &str) -> Value {
    record
        .get(field)
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()))
}

/// Read a list-valued field that may be stored as a `|`-delimited string
///
/// A sequence passes through unchanged, a string is split on `|` without
/// trimming, and a missing key behaves like the empty string (yielding
/// `[""]`).
pub fn extract_list_field(record: &Record, key: &str) -> Result<Vec<String>> {
    match record.get(key) {
        None => Ok(vec![String::new()]),
        Some(Value::String(s)) => Ok(s.split('|').map(str::to_string).collect()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(Error::invalid_field(
                    describe(record),
                    key,
                    format!("list element is {}", type_name(other)),
                )),
            })
            .collect(),
        Some(other) => Err(Error::invalid_field(
            describe(record),
            key,
            format!("expected string or list, found {}", type_name(other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Uniform workshop/tutorial shape
///
/// The identifying and scheduling fields are text. Display fields are carried
/// through as loaded, so a `null` abstract stays `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkshopRecord {
    #[serde(rename = "UID")]
    pub uid: String,
    pub start_time: String,
    pub session: String,
    pub title: Value,
    pub organizers: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Value,
}

/// Uniform paper shape used by poster pages and `papers.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperRecord {
    #[serde(rename = "UID")]
    pub uid: String,
    pub title: Value,
    pub forum: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Value,
    pub session: String,
    pub slides: Value,
    pub poster: Value,
    pub summary_video: Value,
    pub full_video: Value,
    /// Link to the paper itself, from the raw `paper` field
    pub link: Value,
}

/// Normalize a raw workshop or tutorial
pub fn format_workshop(raw: &Record) -> Result<WorkshopRecord> {
    let organizers = extract_list_field(raw, "authors")?;
    Ok(WorkshopRecord {
        uid: require_text(raw, "UID")?,
        start_time: require_text(raw, "start_time")?,
        session: require_text(raw, "session")?,
        title: require_value(raw, "title")?,
        organizers,
        abstract_text: require_value(raw, "abstract")?,
    })
}

/// Normalize a raw paper
pub fn format_paper(raw: &Record) -> Result<PaperRecord> {
    let uid = require_text(raw, "UID")?;
    Ok(PaperRecord {
        title: require_value(raw, "title")?,
        forum: uid.clone(),
        authors: extract_list_field(raw, "authors")?,
        abstract_text: require_value(raw, "abstract")?,
        session: require_text(raw, "session")?,
        slides: optional_value(raw, "slides"),
        poster: optional_value(raw, "poster"),
        summary_video: require_value(raw, "summary_video")?,
        full_video: require_value(raw, "full_video")?,
        link: require_value(raw, "paper")?,
        uid,
    })
}

/// Convert a normalized shape back into a plain record
pub fn to_record<T: Serialize>(value: &T) -> Result<Record> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::invalid_field(
            "normalized record",
            "<root>",
            format!("expected object, found {}", type_name(&other)),
        )),
        Err(e) => Err(Error::invalid_field(
            "normalized record",
            "<root>",
            e.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_extract_list_field_splits_string() {
        let r = record(json!({"authors": "A|B|C"}));
        assert_eq!(extract_list_field(&r, "authors").unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_extract_list_field_passes_list_through() {
        let r = record(json!({"authors": ["A", "B"]}));
        assert_eq!(extract_list_field(&r, "authors").unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_extract_list_field_missing_key() {
        let r = record(json!({}));
        assert_eq!(extract_list_field(&r, "authors").unwrap(), vec![""]);
    }

    #[test]
    fn test_extract_list_field_does_not_trim() {
        let r = record(json!({"authors": " A | B"}));
        assert_eq!(extract_list_field(&r, "authors").unwrap(), vec![" A ", " B"]);
    }

    #[test]
    fn test_extract_list_field_rejects_other_types() {
        let r = record(json!({"UID": "w1", "authors": 42}));
        assert!(matches!(
            extract_list_field(&r, "authors"),
            Err(Error::InvalidField { .. })
        ));

        let r = record(json!({"UID": "w1", "authors": ["A", 1]}));
        assert!(extract_list_field(&r, "authors").is_err());
    }

    #[test]
    fn test_require_text_accepts_numbers() {
        let r = record(json!({"UID": 17}));
        assert_eq!(require_text(&r, "UID").unwrap(), "17");
    }

    #[test]
    fn test_require_text_missing_names_field() {
        let r = record(json!({"UID": "p9"}));
        let err = require_text(&r, "title").unwrap_err();
        assert!(matches!(err, Error::MissingField { .. }));
        let message = err.to_string();
        assert!(message.contains("title"));
        assert!(message.contains("p9"));
    }

    #[test]
    fn test_format_workshop() {
        let raw = record(json!({
            "UID": "w1",
            "start_time": "2021-06-01T09:00:00Z",
            "session": "Morning",
            "title": "Workshop One",
            "authors": "Ada|Grace",
            "abstract": "About things",
            "extra": "dropped"
        }));
        let formatted = format_workshop(&raw).unwrap();
        assert_eq!(formatted.uid, "w1");
        assert_eq!(formatted.organizers, vec!["Ada", "Grace"]);

        let as_record = to_record(&formatted).unwrap();
        let keys: Vec<&str> = as_record.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["UID", "start_time", "session", "title", "organizers", "abstract"]
        );
    }

    #[test]
    fn test_format_workshop_requires_abstract() {
        let raw = record(json!({
            "UID": "w1",
            "start_time": "2021-06-01T09:00:00Z",
            "session": "Morning",
            "title": "Workshop One"
        }));
        assert!(matches!(
            format_workshop(&raw),
            Err(Error::MissingField { ref field, .. }) if field == "abstract"
        ));
    }

    #[test]
    fn test_format_workshop_keeps_non_text_fields() {
        let raw = record(json!({
            "UID": "w2",
            "start_time": "2021-06-01T09:00:00Z",
            "session": "Morning",
            "title": 2021,
            "authors": "Ada",
            "abstract": null
        }));
        let formatted = format_workshop(&raw).unwrap();
        assert_eq!(formatted.title, json!(2021));
        assert_eq!(formatted.abstract_text, Value::Null);

        let as_record = to_record(&formatted).unwrap();
        assert!(as_record["abstract"].is_null());
    }

    #[test]
    fn test_format_paper_keeps_non_text_fields() {
        let raw = record(json!({
            "UID": "p2",
            "title": "T",
            "abstract": null,
            "session": "S1",
            "authors": "X",
            "summary_video": null,
            "full_video": 0,
            "paper": "x.pdf",
            "slides": null
        }));
        let paper = format_paper(&raw).unwrap();
        assert!(paper.abstract_text.is_null());
        assert!(paper.summary_video.is_null());
        assert_eq!(paper.full_video, json!(0));
        assert!(paper.slides.is_null());
        assert_eq!(paper.poster, "");
    }

    #[test]
    fn test_format_paper_defaults_and_link() {
        let raw = record(json!({
            "UID": "p1",
            "title": "T",
            "abstract": "A",
            "session": "S1",
            "start_time": "2021-06-01T09:00:00Z",
            "authors": "X|Y",
            "summary_video": "",
            "full_video": "",
            "paper": "x.pdf"
        }));
        let paper = format_paper(&raw).unwrap();
        assert_eq!(paper.forum, "p1");
        assert_eq!(paper.authors, vec!["X", "Y"]);
        assert_eq!(paper.slides, "");
        assert_eq!(paper.poster, "");
        assert_eq!(paper.link, "x.pdf");

        let as_record = to_record(&paper).unwrap();
        assert_eq!(as_record["abstract"], "A");
        assert!(!as_record.contains_key("start_time"));
    }

    #[test]
    fn test_format_paper_requires_videos() {
        let raw = record(json!({
            "UID": "p1",
            "title": "T",
            "abstract": "A",
            "session": "S1",
            "paper": "x.pdf"
        }));
        assert!(format_paper(&raw).is_err());
    }
}
