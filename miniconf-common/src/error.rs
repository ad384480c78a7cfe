//! Common error types for MiniConf

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for MiniConf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading, indexing or exporting site data
///
/// Everything except `NotFound` is fatal at startup: the site either loads
/// completely or the process does not start.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error on a specific path
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON dataset
    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Malformed YAML dataset
    #[error("YAML error in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Malformed CSV/TSV dataset
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Required field absent from a record
    #[error("Missing field '{field}' in {context}")]
    MissingField { context: String, field: String },

    /// Field present but of an unusable type
    #[error("Invalid field '{field}' in {context}: {reason}")]
    InvalidField {
        context: String,
        field: String,
        reason: String,
    },

    /// `start_time` that does not match `%Y-%m-%dT%H:%M:%SZ`
    #[error("Invalid start_time '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Dataset whose top-level structure does not match its entity type
    #[error("Dataset '{dataset}' has unexpected shape: expected {expected}")]
    Shape { dataset: String, expected: String },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested dataset, entity or page not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Static export failure
    #[error("Export error: {0}")]
    Export(String),
}

impl Error {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a missing-field error
    pub fn missing_field(context: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            context: context.into(),
            field: field.into(),
        }
    }

    /// Create an invalid-field error
    pub fn invalid_field(
        context: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            context: context.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is a lookup miss rather than a load failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
