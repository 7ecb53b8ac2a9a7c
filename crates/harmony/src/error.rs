//! Error types for the Harmony library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Harmony operations.
///
/// Every variant is fatal: the pipeline stops and nothing is written to the
/// destination. Variants raised from curated input name the column and value
/// so the mapping document can be fixed and the run repeated.
#[derive(Debug, Error)]
pub enum HarmonyError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the Avro container writer.
    #[error("Avro error: {0}")]
    Avro(#[from] apache_avro::Error),

    /// Invalid delimiter specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty file or no data to classify.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminology service request failed.
    #[error("Terminology lookup failed: {0}")]
    Lookup(String),

    /// The input table names the same column twice.
    #[error("Duplicate column '{0}' in input header")]
    DuplicateColumn(String),

    /// The mapping document does not have the expected shape.
    #[error("Malformed mapping document at '{field}': {reason}")]
    MalformedDocument { field: String, reason: String },

    /// A data column has no descriptor in the mapping document.
    #[error("Column '{0}' is not described in the mapping document")]
    UnknownColumn(String),

    /// Two distinct names escape to the same container identifier.
    #[error("Columns '{first}' and '{second}' both encode to '{encoded}'")]
    NameCollision {
        first: String,
        second: String,
        encoded: String,
    },

    /// A string is not a valid escaped container identifier.
    #[error("Invalid encoded name '{name}': {reason}")]
    InvalidEncodedName { name: String, reason: String },

    /// A declared numeric column holds a value that does not parse.
    #[error("Column '{column}' is declared {expected} but holds '{value}'")]
    TypeCoercionError {
        column: String,
        value: String,
        expected: &'static str,
    },

    /// A value is listed in the mapping but has no harmonized label.
    #[error("Value '{value}' in column '{column}' has no harmonized label")]
    UnmappedValue { column: String, value: String },

    /// More than one permissible value entry matches a data value.
    #[error("Value '{value}' in column '{column}' matches {matches} permissible value entries")]
    AmbiguousMapping {
        column: String,
        value: String,
        matches: usize,
    },
}

impl HarmonyError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarmonyError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for Harmony operations.
pub type Result<T> = std::result::Result<T, HarmonyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_column_and_value() {
        let err = HarmonyError::UnmappedValue {
            column: "color".to_string(),
            value: "teal".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("color"));
        assert!(message.contains("teal"));

        let err = HarmonyError::AmbiguousMapping {
            column: "sex".to_string(),
            value: "M".to_string(),
            matches: 2,
        };
        assert_eq!(
            err.to_string(),
            "Value 'M' in column 'sex' matches 2 permissible value entries"
        );
    }
}
