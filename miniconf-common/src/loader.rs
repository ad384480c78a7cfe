//! Site data loading
//!
//! Reads every file directly inside the site data directory and parses it
//! into a dataset keyed by the file's base name. The format is chosen from
//! the file extension; unknown extensions are skipped.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::{Error, Result};

/// Source formats understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Csv,
    /// Tab-delimited, unlike `Csv`; the header row names the columns
    Tsv,
    Yaml,
}

impl DatasetFormat {
    /// Map a format tag (the file name after its first `.`) to a format
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Split `papers.json` into `("papers", "json")`
///
/// The name is everything before the first `.`, the tag everything after.
/// Names without a `.` have no tag and yield `None`.
pub fn split_file_name(file_name: &str) -> Option<(&str, &str)> {
    file_name.split_once('.')
}

/// Parsed datasets keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Datasets(BTreeMap<String, Value>);

impl Datasets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a dataset, returning the one it replaced
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Look up a dataset, failing with `NotFound` when it is absent
    pub fn require(&self, name: &str) -> Result<&Value> {
        self.get(name)
            .ok_or_else(|| Error::NotFound(format!("dataset '{}'", name)))
    }

    /// Look up a named field inside a dataset (`committee.committee`)
    pub fn require_field(&self, name: &str, field: &str) -> Result<&Value> {
        self.require(name)?
            .get(field)
            .ok_or_else(|| Error::missing_field(format!("dataset '{}'", name), field))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Dataset names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Datasets {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Result of loading a site data directory
#[derive(Debug, Clone, Default)]
pub struct LoadedContent {
    pub datasets: Datasets,
    /// Every regular file that was considered, for file-watch hints
    pub watch_paths: Vec<PathBuf>,
}

/// Load every dataset directly inside `dir`
///
/// Files are visited in file-name order so that a later file with the same
/// dataset name deterministically replaces an earlier one.
pub fn load_site_data(dir: &Path) -> Result<LoadedContent> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if file_type.is_dir() {
            debug!("Skipping directory {}", entry.path().display());
            continue;
        }
        // Hidden files (editor swap files, backups) are not datasets
        if entry.file_name().to_string_lossy().starts_with('.') {
            debug!("Skipping hidden file {}", entry.path().display());
            continue;
        }
        files.push(entry.path());
    }
    files.sort();

    let mut content = LoadedContent::default();
    for path in files {
        content.watch_paths.push(path.clone());

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!("Skipping non UTF-8 file name {}", path.display());
            continue;
        };
        let Some((name, tag)) = split_file_name(file_name) else {
            debug!("Ignoring {} (no extension)", path.display());
            continue;
        };
        let Some(format) = DatasetFormat::from_tag(tag) else {
            debug!("Ignoring {} (unsupported format '{}')", path.display(), tag);
            continue;
        };

        info!("Loading {}", path.display());
        let value = parse_dataset(&path, format)?;
        if content.datasets.insert(name, value).is_some() {
            warn!("Dataset '{}' replaced by {}", name, path.display());
        }
    }

    info!(
        "Loaded {} datasets from {}",
        content.datasets.len(),
        dir.display()
    );
    Ok(content)
}

/// Parse a single file in the given format
pub fn parse_dataset(path: &Path, format: DatasetFormat) -> Result<Value> {
    match format {
        DatasetFormat::Json => {
            let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            serde_json::from_str(&text).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                source,
            })
        }
        DatasetFormat::Yaml => {
            let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            serde_yaml::from_str(&text).map_err(|source| Error::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        DatasetFormat::Csv => parse_delimited(path, b','),
        DatasetFormat::Tsv => parse_delimited(path, b'\t'),
    }
}

/// Read a delimited file into a sequence of header → string records
fn parse_delimited(path: &Path, delimiter: u8) -> Result<Value> {
    let file = fs::File::open(path).map_err(|e| Error::io(path, e))?;
    let csv_err = |source: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(file);
    let headers = reader.headers().map_err(csv_err)?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, field)| (header.to_string(), Value::String(field.to_string())))
            .collect();
        rows.push(Value::Object(row));
    }

    Ok(Value::Array(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("papers.json"), Some(("papers", "json")));
        assert_eq!(split_file_name("a.b.json"), Some(("a", "b.json")));
        assert_eq!(split_file_name(".hidden"), Some(("", "hidden")));
        assert_eq!(split_file_name("README"), None);
    }

    #[test]
    fn test_format_from_tag() {
        assert_eq!(DatasetFormat::from_tag("json"), Some(DatasetFormat::Json));
        assert_eq!(DatasetFormat::from_tag("csv"), Some(DatasetFormat::Csv));
        assert_eq!(DatasetFormat::from_tag("tsv"), Some(DatasetFormat::Tsv));
        assert_eq!(DatasetFormat::from_tag("yml"), Some(DatasetFormat::Yaml));
        assert_eq!(DatasetFormat::from_tag("yaml"), Some(DatasetFormat::Yaml));
        assert_eq!(DatasetFormat::from_tag("md"), None);
        assert_eq!(DatasetFormat::from_tag("b.json"), None);
        assert_eq!(DatasetFormat::from_tag("JSON"), None);
    }

    #[test]
    fn test_datasets_require() {
        let mut datasets = Datasets::new();
        datasets.insert("faq", serde_json::json!({"FAQ": [1, 2]}));

        assert!(datasets.require("faq").is_ok());
        assert!(datasets.require("missing").unwrap_err().is_not_found());
        assert_eq!(
            datasets.require_field("faq", "FAQ").unwrap(),
            &serde_json::json!([1, 2])
        );
        assert!(matches!(
            datasets.require_field("faq", "other"),
            Err(Error::MissingField { .. })
        ));
    }
}
