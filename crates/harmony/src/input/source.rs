//! Data source abstraction and metadata.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub read_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe a file from its raw contents and the table parsed from them.
    pub fn describe(path: &Path, contents: &[u8], table: &DataTable) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = match table.delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        };

        Self {
            file,
            path: path.to_path_buf(),
            hash: format!("sha256:{:x}", Sha256::digest(contents)),
            size_bytes: contents.len() as u64,
            format: format.to_string(),
            row_count: table.row_count(),
            column_count: table.column_count(),
            read_at: Utc::now(),
        }
    }
}

/// Parsed tabular data, held fully in memory.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
    /// The delimiter used.
    pub delimiter: u8,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, delimiter: u8) -> Self {
        Self {
            headers,
            rows,
            delimiter,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Position of a column in the header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Check if a value is missing: empty or whitespace only.
    pub fn is_blank(value: &str) -> bool {
        value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(DataTable::is_blank(""));
        assert!(DataTable::is_blank("   "));
        assert!(DataTable::is_blank("\t"));
        assert!(!DataTable::is_blank("NA"));
        assert!(!DataTable::is_blank("0"));
    }

    #[test]
    fn test_column_lookup() {
        let table = DataTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["1".to_string(), "x".to_string()], vec!["2".to_string()]],
            b',',
        );
        assert_eq!(table.column_index("b"), Some(1));
        assert_eq!(table.column_index("c"), None);
        let b: Vec<&str> = table.column_values(1).collect();
        assert_eq!(b, vec!["x", ""]);
    }

    #[test]
    fn test_describe_hashes_contents() {
        let table = DataTable::new(vec!["a".to_string()], vec![vec!["1".to_string()]], b'\t');
        let meta = SourceMetadata::describe(Path::new("data/cohort.tsv"), b"a\n1\n", &table);
        assert_eq!(meta.file, "cohort.tsv");
        assert_eq!(meta.format, "tsv");
        assert_eq!(meta.size_bytes, 4);
        assert!(meta.hash.starts_with("sha256:"));
        assert_eq!(meta.hash.len(), "sha256:".len() + 64);
    }
}
