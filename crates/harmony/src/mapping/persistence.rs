//! Persistence for mapping documents - save/load JSON files.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use super::document::MappingDocument;
use crate::atomic::write_atomically;
use crate::error::{HarmonyError, Result};

impl MappingDocument {
    /// Save the document as pretty-printed JSON.
    ///
    /// The file is replaced atomically, so a curator's previous copy survives
    /// a failed save.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use harmony::MappingDocument;
    /// # fn example(document: &MappingDocument) -> harmony::Result<()> {
    /// document.save("cohort.mapping.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let value = self.to_document_form();
        write_atomically(path, |writer| {
            serde_json::to_writer_pretty(&mut *writer, &value)?;
            writer
                .write_all(b"\n")
                .map_err(|e| HarmonyError::io(path, e))
        })?;
        debug!("Saved {} field(s) to '{}'", self.len(), path.display());
        Ok(())
    }

    /// Load a document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| HarmonyError::io(path, e))?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| HarmonyError::MalformedDocument {
                field: "$".to_string(),
                reason: format!("'{}' is not valid JSON: {}", path.display(), e),
            })?;
        Self::from_document_form(&value)
    }
}

/// Generate a mapping document path for a data file.
///
/// # Example
///
/// ```
/// use harmony::mapping::mapping_path;
///
/// let path = mapping_path("data/cohort.tsv");
/// assert_eq!(path.to_string_lossy(), "data/cohort.mapping.json");
/// ```
pub fn mapping_path(data_path: impl AsRef<Path>) -> PathBuf {
    let data_path = data_path.as_ref();
    let stem = data_path.file_stem().unwrap_or_default().to_string_lossy();
    let parent = data_path.parent().unwrap_or(Path::new("."));

    parent.join(format!("{}.mapping.json", stem))
}
