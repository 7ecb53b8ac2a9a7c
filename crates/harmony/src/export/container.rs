//! Harmonized export as an Avro object container in the PFB entity layout.
//!
//! The file holds a stream of `Entity` records. The first wraps a `Metadata`
//! record describing every exported column; each following entity wraps one
//! data row.

use std::collections::HashMap;
use std::path::Path;

use apache_avro::types::Value as AvroValue;
use apache_avro::{Schema, Writer};
use log::{debug, info};
use serde_json::{Value, json};

use super::avro::install_name_validators;
use super::harmonize::{Datum, HarmonizationMapper};
use super::schema::{DEFAULT_NODE_NAME, ExportField, ExportSchema, FieldKind};
use crate::atomic::write_atomically;
use crate::error::{HarmonyError, Result};
use crate::input::DataTable;
use crate::mapping::MappingDocument;

/// Default number of entities per container block.
pub const DEFAULT_BLOCK_RECORDS: usize = 1000;

/// Where registry identifiers in the mapping document can be resolved.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Registry name recorded as each property's `source`.
    pub source: String,
    /// Lookup URL template; `{id}` and `{version}` are substituted.
    pub lookup_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            source: "caDSR".to_string(),
            lookup_url: "https://cadsrapi.cancer.gov/rad/NCIAPI/1.0/api/DataElement/{id}?version={version}"
                .to_string(),
        }
    }
}

impl RegistryConfig {
    /// Registry with a custom name and lookup URL template.
    pub fn new(source: impl Into<String>, lookup_url: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            lookup_url: lookup_url.into(),
        }
    }

    /// The lookup URL of one registry entry.
    pub fn term_url(&self, id: &str, version: &str) -> String {
        self.lookup_url
            .replace("{id}", id)
            .replace("{version}", version)
    }
}

/// Container output settings.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Name of the row record type and of every row entity.
    pub node_name: String,
    /// Maximum entities per data block.
    pub block_records: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            node_name: DEFAULT_NODE_NAME.to_string(),
            block_records: DEFAULT_BLOCK_RECORDS,
        }
    }
}

impl ExportConfig {
    /// Set the row record name.
    pub fn with_node_name(mut self, name: impl Into<String>) -> Self {
        self.node_name = name.into();
        self
    }

    /// Set the block size.
    pub fn with_block_records(mut self, block_records: usize) -> Self {
        self.block_records = block_records;
        self
    }
}

/// Counts reported after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSummary {
    /// Data row entities written (the metadata entity is not counted).
    pub rows: usize,
}

/// Writes harmonized tables as object container files.
pub struct ContainerWriter {
    registry: RegistryConfig,
    config: ExportConfig,
}

impl ContainerWriter {
    /// Writer with default registry and block settings.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default(), ExportConfig::default())
    }

    /// Writer with explicit settings.
    pub fn with_config(registry: RegistryConfig, config: ExportConfig) -> Self {
        Self { registry, config }
    }

    /// Full container schema: the `Entity` envelope around `schema`.
    pub fn schema_json(schema: &ExportSchema) -> Value {
        let string_map = json!({"type": "map", "values": "string"});
        let property = json!({
            "type": "record",
            "name": "Property",
            "fields": [
                {"name": "name", "type": "string"},
                {"name": "ontology_reference", "type": "string"},
                {"name": "values", "type": string_map},
            ],
        });
        let node = json!({
            "type": "record",
            "name": "Node",
            "fields": [
                {"name": "name", "type": "string"},
                {"name": "ontology_reference", "type": "string"},
                {"name": "values", "type": string_map},
                {"name": "properties", "type": {"type": "array", "items": property}},
            ],
        });
        let metadata = json!({
            "type": "record",
            "name": "Metadata",
            "fields": [
                {"name": "nodes", "type": {"type": "array", "items": node}},
                {"name": "misc", "type": string_map},
            ],
        });
        let relation = json!({
            "type": "record",
            "name": "Relation",
            "fields": [
                {"name": "dst_id", "type": "string"},
                {"name": "dst_name", "type": "string"},
            ],
        });

        json!({
            "type": "record",
            "name": "Entity",
            "fields": [
                {"name": "id", "type": ["null", "string"], "default": null},
                {"name": "name", "type": "string"},
                {"name": "object", "type": [metadata, schema.to_schema_json()]},
                {"name": "relations", "type": {"type": "array", "items": relation}, "default": []},
            ],
        })
    }

    /// Write `table` to `path`, harmonized through `document`.
    ///
    /// Every cell is mapped before it is written; the first failing cell
    /// aborts the export and leaves nothing at `path`. A block is closed
    /// after `block_records` entities, or earlier once its encoded size
    /// reaches the writer's byte threshold.
    pub fn write(
        &self,
        path: impl AsRef<Path>,
        schema: &ExportSchema,
        document: &MappingDocument,
        table: &DataTable,
    ) -> Result<ContainerSummary> {
        let path = path.as_ref();
        if self.config.block_records == 0 {
            return Err(HarmonyError::Config(
                "block_records must be at least 1".to_string(),
            ));
        }

        let columns = column_indices(schema, table)?;
        let mapper = HarmonizationMapper::new(document);

        install_name_validators();
        let container_schema = Schema::parse(&Self::schema_json(schema))?;
        let metadata = self.metadata_entity(schema, document);

        let mut summary = ContainerSummary { rows: 0 };
        write_atomically(path, |out| {
            let mut writer = Writer::new(&container_schema, out);
            writer.append(metadata)?;

            let mut pending = 1;
            for (index, row) in table.rows.iter().enumerate() {
                if pending == self.config.block_records {
                    writer.flush()?;
                    pending = 0;
                }
                writer.append(row_entity(&mapper, schema, &columns, index, row)?)?;
                pending += 1;
                summary.rows += 1;
            }

            writer.flush()?;
            Ok(())
        })?;

        info!("Wrote {} row(s) to '{}'", summary.rows, path.display());
        Ok(summary)
    }

    /// The leading entity: one node describing every exported column.
    fn metadata_entity(&self, schema: &ExportSchema, document: &MappingDocument) -> AvroValue {
        let properties = schema
            .fields
            .iter()
            .map(|field| {
                let annotation = document.get(&field.column).and_then(|d| d.annotation());
                let description = annotation.map(|a| a.description.as_str()).unwrap_or("");

                let mut values = HashMap::new();
                if let Some(annotation) = annotation.filter(|a| a.has_registry_id()) {
                    let id = annotation.registry_id.trim();
                    let version = annotation.registry_version.trim();
                    values.insert("source".to_string(), text(&self.registry.source));
                    values.insert("cde_id".to_string(), text(id));
                    values.insert("cde_version".to_string(), text(version));
                    values.insert("term_url".to_string(), text(&self.registry.term_url(id, version)));
                }
                debug!("Metadata property '{}' ({} value(s))", field.name, values.len());

                record(vec![
                    ("name", text(&field.name)),
                    ("ontology_reference", text(description)),
                    ("values", AvroValue::Map(values)),
                ])
            })
            .collect();

        let node = record(vec![
            ("name", text(&schema.name)),
            ("ontology_reference", text(document.title.as_deref().unwrap_or(""))),
            ("values", AvroValue::Map(HashMap::new())),
            ("properties", AvroValue::Array(properties)),
        ]);
        let metadata = record(vec![
            ("nodes", AvroValue::Array(vec![node])),
            ("misc", AvroValue::Map(HashMap::new())),
        ]);

        record(vec![
            ("id", AvroValue::Union(0, Box::new(AvroValue::Null))),
            ("name", text("Metadata")),
            ("object", AvroValue::Union(0, Box::new(metadata))),
            ("relations", AvroValue::Array(Vec::new())),
        ])
    }
}

impl Default for ContainerWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn text(s: &str) -> AvroValue {
    AvroValue::String(s.to_string())
}

fn record(fields: Vec<(&str, AvroValue)>) -> AvroValue {
    AvroValue::Record(
        fields
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    )
}

/// Position of each schema field's column in the table header.
fn column_indices(schema: &ExportSchema, table: &DataTable) -> Result<Vec<usize>> {
    schema
        .fields
        .iter()
        .map(|field| {
            table
                .column_index(&field.column)
                .ok_or_else(|| HarmonyError::UnknownColumn(field.column.clone()))
        })
        .collect()
}

fn row_entity(
    mapper: &HarmonizationMapper<'_>,
    schema: &ExportSchema,
    columns: &[usize],
    index: usize,
    row: &[String],
) -> Result<AvroValue> {
    let mut fields = Vec::with_capacity(columns.len());
    for (field, &column) in schema.fields.iter().zip(columns) {
        let cell = row.get(column).map(String::as_str).unwrap_or("");
        let datum = mapper.map_value(&field.column, cell)?;
        fields.push((field.name.clone(), field_value(field, datum.as_ref())?));
    }

    Ok(record(vec![
        ("id", AvroValue::Union(1, Box::new(AvroValue::String(format!("row{index}"))))),
        ("name", text(&schema.name)),
        ("object", AvroValue::Union(1, Box::new(AvroValue::Record(fields)))),
        ("relations", AvroValue::Array(Vec::new())),
    ]))
}

/// The nullable union value of one cell.
fn field_value(field: &ExportField, datum: Option<&Datum>) -> Result<AvroValue> {
    let Some(datum) = datum else {
        return Ok(AvroValue::Union(0, Box::new(AvroValue::Null)));
    };
    let value = match (&field.kind, datum) {
        (FieldKind::Long, Datum::Long(n)) => AvroValue::Long(*n),
        (FieldKind::Text, Datum::Text(s)) => AvroValue::String(s.clone()),
        (FieldKind::Enum { .. }, Datum::Symbol(symbol)) => {
            let position = field
                .symbol_index(symbol)
                .ok_or_else(|| HarmonyError::UnmappedValue {
                    column: field.column.clone(),
                    value: symbol.clone(),
                })?;
            AvroValue::Enum(position as u32, symbol.clone())
        }
        (kind, other) => {
            return Err(HarmonyError::TypeCoercionError {
                column: field.column.clone(),
                value: other.as_text(),
                expected: match kind {
                    FieldKind::Long => "integer",
                    FieldKind::Text => "string",
                    FieldKind::Enum { .. } => "enum",
                },
            });
        }
    };
    Ok(AvroValue::Union(1, Box::new(value)))
}
