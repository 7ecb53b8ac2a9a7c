//! Main Harmony struct and public API.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::error::{HarmonyError, Result};
use crate::export::{
    ContainerWriter, DelimitedWriter, ExportConfig, ExportSchemaBuilder, LinkedDataConfig,
    LinkedDataWriter, RegistryConfig,
};
use crate::inference::{ClassifierConfig, FieldClassifier};
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::mapping::MappingDocument;

/// Configuration for the whole pipeline.
#[derive(Debug, Clone, Default)]
pub struct HarmonyConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Field classification configuration.
    pub classifier: ClassifierConfig,
    /// Registry referenced by field annotations.
    pub registry: RegistryConfig,
    /// Container output configuration.
    pub export: ExportConfig,
    /// Base IRIs for JSON-LD output.
    pub linked_data: LinkedDataConfig,
}

/// Output formats for harmonized data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Avro object container in the PFB entity layout.
    Pfb,
    /// Comma-separated text.
    Csv,
    /// Tab-separated text.
    Tsv,
    /// JSON-LD graph.
    JsonLd,
}

impl OutputFormat {
    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pfb => "avro",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::JsonLd => "jsonld",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Pfb => "pfb",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::JsonLd => "jsonld",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = HarmonyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pfb" | "avro" => Ok(OutputFormat::Pfb),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "jsonld" | "json-ld" => Ok(OutputFormat::JsonLd),
            other => Err(HarmonyError::Config(format!("Unknown output format '{}'", other))),
        }
    }
}

/// Result of inferring a mapping document from a data file.
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Freshly classified, uncurated document.
    pub document: MappingDocument,
}

/// Result of a harmonized export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// Where the output was written.
    pub path: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// Data rows written.
    pub rows: usize,
}

/// The main Harmony pipeline.
pub struct Harmony {
    config: HarmonyConfig,
    parser: Parser,
    classifier: FieldClassifier,
}

impl Harmony {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(HarmonyConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: HarmonyConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let classifier = FieldClassifier::with_config(config.classifier.clone());
        Self {
            config,
            parser,
            classifier,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &HarmonyConfig {
        &self.config
    }

    /// Parse a data file.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        self.parser.parse_file(path)
    }

    /// Infer a mapping document from a data file.
    pub fn infer(&self, path: impl AsRef<Path>) -> Result<InferenceResult> {
        let (table, source) = self.read(path)?;
        let document = self.classifier.classify_table(&table)?;
        Ok(InferenceResult { source, document })
    }

    /// Export a data file harmonized through `document`.
    pub fn export(
        &self,
        data: impl AsRef<Path>,
        document: &MappingDocument,
        output: impl AsRef<Path>,
        format: OutputFormat,
    ) -> Result<ExportReport> {
        let (table, _) = self.read(data)?;
        self.export_table(&table, document, output, format)
    }

    /// Export a parsed table harmonized through `document`.
    ///
    /// The row schema is compiled first for every format, so column and
    /// naming problems are reported before any cell is mapped.
    pub fn export_table(
        &self,
        table: &DataTable,
        document: &MappingDocument,
        output: impl AsRef<Path>,
        format: OutputFormat,
    ) -> Result<ExportReport> {
        let output = output.as_ref();
        let schema = ExportSchemaBuilder::with_node_name(self.config.export.node_name.clone())
            .build(document, &table.headers)?;

        let rows = match format {
            OutputFormat::Pfb => {
                ContainerWriter::with_config(self.config.registry.clone(), self.config.export.clone())
                    .write(output, &schema, document, table)?
                    .rows
            }
            OutputFormat::Csv => DelimitedWriter::csv().write(output, document, table)?,
            OutputFormat::Tsv => DelimitedWriter::tsv().write(output, document, table)?,
            OutputFormat::JsonLd => LinkedDataWriter::new(self.config.linked_data.clone())
                .write(output, document, table)?,
        };

        Ok(ExportReport {
            path: output.to_path_buf(),
            format,
            rows,
        })
    }
}

impl Default for Harmony {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("PFB".parse::<OutputFormat>().unwrap(), OutputFormat::Pfb);
        assert_eq!("json-ld".parse::<OutputFormat>().unwrap(), OutputFormat::JsonLd);
        assert!("xlsx".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::JsonLd.to_string(), "jsonld");
        assert_eq!(OutputFormat::Pfb.extension(), "avro");
    }

    #[test]
    fn test_infer() {
        let file = create_test_csv("id,name\n1,Alice\n2,Bob\n3,Carol\n");
        let result = Harmony::new().infer(file.path()).unwrap();

        assert_eq!(result.source.row_count, 3);
        assert_eq!(result.document.columns().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(result.document.get("id").unwrap().type_name(), "integer");
    }

    #[test]
    fn test_export_rejects_undocumented_columns() {
        let file = create_test_csv("id,name\n1,Alice\n");
        let mut document = MappingDocument::new();
        document
            .insert(
                "id",
                crate::FieldDescriptor::Int {
                    required: true,
                    range: None,
                    annotation: Default::default(),
                },
            )
            .unwrap();
        let dir = tempfile::tempdir().unwrap();

        let err = Harmony::new()
            .export(file.path(), &document, dir.path().join("out.csv"), OutputFormat::Csv)
            .unwrap_err();
        assert!(matches!(err, HarmonyError::UnknownColumn(name) if name == "name"));
    }

    #[test]
    fn test_infer_then_export_csv() {
        let file = create_test_csv("id,score\n1,2.5\n2,3.75\n3,1\n");
        let harmony = Harmony::new();
        let document = harmony.infer(file.path()).unwrap().document;
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");

        let report = harmony
            .export(file.path(), &document, &out, OutputFormat::Csv)
            .unwrap();
        assert_eq!(report.rows, 3);
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "id,score\n1,2.5\n2,3.75\n3,1\n"
        );
    }
}
