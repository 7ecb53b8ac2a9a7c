//! CSV/TSV parser with delimiter detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use super::source::{DataTable, SourceMetadata};
use crate::error::{HarmonyError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses delimited data files with a header row.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let mut contents = Vec::new();
        File::open(path)
            .and_then(|mut file| file.read_to_end(&mut contents))
            .map_err(|e| HarmonyError::io(path, e))?;

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };
        debug!(
            "Reading '{}' with delimiter {:?}",
            path.display(),
            delimiter as char
        );

        let data_table = self.parse_bytes(&contents, delimiter)?;
        let source_metadata = SourceMetadata::describe(path, &contents, &data_table);
        Ok((data_table, source_metadata))
    }

    /// Parse bytes directly.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(HarmonyError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            // Ragged rows are padded or cut to the header width
            row.resize(expected_cols, String::new());

            rows.push(row);
        }

        if rows.is_empty() {
            return Err(HarmonyError::EmptyData("No data rows found".to_string()));
        }

        Ok(DataTable::new(headers, rows, delimiter))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a user-supplied delimiter name or character.
pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "tab" | "\t" | "\\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "pipe" | "|" => Ok(b'|'),
        "semicolon" | ";" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars.next().ok_or_else(|| {
                HarmonyError::InvalidDelimiter("delimiter cannot be empty".to_string())
            })?;
            if chars.next().is_some() || !first.is_ascii() {
                return Err(HarmonyError::InvalidDelimiter(format!(
                    "'{other}' is not a single ASCII character"
                )));
            }
            Ok(first as u8)
        }
    }
}

/// Records sampled per candidate when sniffing the delimiter.
const SNIFF_RECORDS: usize = 10;

/// Pick the candidate delimiter that splits the sampled records into the same
/// number of fields everywhere, preferring more fields. Candidates are tried
/// in [`DELIMITERS`] order, so tab wins ties.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(HarmonyError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best: Option<(u8, usize)> = None;
    for &delimiter in DELIMITERS {
        let Some(width) = consistent_width(bytes, delimiter) else {
            continue;
        };
        if best.is_none_or(|(_, best_width)| width > best_width) {
            best = Some((delimiter, width));
        }
    }

    Ok(best.map(|(d, _)| d).unwrap_or(b','))
}

/// Field count shared by the first records, if it is above one and the same
/// for every sampled record.
fn consistent_width(bytes: &[u8], delimiter: u8) -> Option<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut width = None;
    for record in reader.records().take(SNIFF_RECORDS) {
        let len = record.ok()?.len();
        match width {
            None => width = Some(len),
            Some(w) if w != len => return None,
            Some(_) => {}
        }
    }
    width.filter(|&w| w > 1)
}
