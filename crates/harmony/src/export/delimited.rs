//! Harmonized export back to delimited text.

use std::path::Path;

use log::info;

use super::harmonize::{Datum, HarmonizationMapper};
use super::naming;
use crate::atomic::write_atomically;
use crate::error::{HarmonyError, Result};
use crate::input::DataTable;
use crate::mapping::MappingDocument;

/// Writes a table with enum cells replaced by their harmonized labels.
pub struct DelimitedWriter {
    delimiter: u8,
}

impl DelimitedWriter {
    /// Writer using the given field delimiter.
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Comma-separated output.
    pub fn csv() -> Self {
        Self::new(b',')
    }

    /// Tab-separated output.
    pub fn tsv() -> Self {
        Self::new(b'\t')
    }

    /// Write `table` to `path`, keeping the original header. Returns the
    /// number of data rows written.
    pub fn write(
        &self,
        path: impl AsRef<Path>,
        document: &MappingDocument,
        table: &DataTable,
    ) -> Result<usize> {
        let path = path.as_ref();
        let mapper = HarmonizationMapper::new(document);

        write_atomically(path, |out| {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(self.delimiter)
                .from_writer(out);
            writer.write_record(&table.headers)?;

            let mut record = Vec::with_capacity(table.column_count());
            for row in &table.rows {
                record.clear();
                for (index, column) in table.headers.iter().enumerate() {
                    let cell = row.get(index).map(String::as_str).unwrap_or("");
                    record.push(render(mapper.map_value(column, cell)?)?);
                }
                writer.write_record(&record)?;
            }
            writer.flush().map_err(|e| HarmonyError::io(path, e))
        })?;

        info!("Wrote {} row(s) to '{}'", table.row_count(), path.display());
        Ok(table.row_count())
    }
}

fn render(datum: Option<Datum>) -> Result<String> {
    Ok(match datum {
        None => String::new(),
        Some(Datum::Symbol(symbol)) => naming::decode(&symbol)?,
        Some(other) => other.as_text(),
    })
}
