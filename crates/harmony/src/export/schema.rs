//! Compiling a mapping document into the container's row schema.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde_json::{Value, json};

use super::naming;
use crate::error::{HarmonyError, Result};
use crate::mapping::{EnumValue, FieldDescriptor, MappingDocument};

/// Record names used by the container envelope; row records may not reuse them.
pub const RESERVED_TYPE_NAMES: &[&str] = &["Entity", "Metadata", "Node", "Property", "Relation"];

/// Default name of the row record type.
pub const DEFAULT_NODE_NAME: &str = "row";

/// Primitive or enumerated type of an exported field. Every field is nullable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// 64-bit integer.
    Long,
    /// Text, including decimal numbers kept as written.
    Text,
    /// Named enumeration over encoded harmonized labels.
    Enum {
        type_name: String,
        symbols: Vec<String>,
    },
}

/// One field of the row record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportField {
    /// Column name as it appears in the data and the mapping document.
    pub column: String,
    /// Encoded field name used inside the container.
    pub name: String,
    /// Field type.
    pub kind: FieldKind,
}

impl ExportField {
    /// Position of an encoded symbol in this field's enumeration.
    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        match &self.kind {
            FieldKind::Enum { symbols, .. } => symbols.iter().position(|s| s == symbol),
            _ => None,
        }
    }
}

/// The row record type: one nullable field per column, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSchema {
    /// Encoded record name.
    pub name: String,
    /// Fields in column order.
    pub fields: Vec<ExportField>,
}

impl ExportSchema {
    /// Look up a field by its column name.
    pub fn field(&self, column: &str) -> Option<&ExportField> {
        self.fields.iter().find(|f| f.column == column)
    }

    /// The record schema as container JSON.
    pub fn to_schema_json(&self) -> Value {
        let fields: Vec<Value> = self
            .fields
            .iter()
            .map(|field| {
                let inner = match &field.kind {
                    FieldKind::Long => json!("long"),
                    FieldKind::Text => json!("string"),
                    FieldKind::Enum { type_name, symbols } => json!({
                        "type": "enum",
                        "name": type_name,
                        "symbols": symbols,
                    }),
                };
                json!({
                    "name": field.name,
                    "type": ["null", inner],
                    "default": null,
                })
            })
            .collect();

        json!({
            "type": "record",
            "name": self.name,
            "fields": fields,
        })
    }
}

/// The container symbol for a curated value.
pub fn symbol_for(value: &EnumValue) -> String {
    naming::encode(&value.harmonized_label)
}

/// Builds an [`ExportSchema`] from a mapping document.
pub struct ExportSchemaBuilder {
    node_name: String,
}

impl ExportSchemaBuilder {
    /// Builder producing records named [`DEFAULT_NODE_NAME`].
    pub fn new() -> Self {
        Self::with_node_name(DEFAULT_NODE_NAME)
    }

    /// Builder producing records with the given (unencoded) name.
    pub fn with_node_name(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
        }
    }

    /// Compile the schema for `column_order`, the columns observed in the data.
    ///
    /// Every column must have a descriptor. Enum fields keep only values with
    /// a harmonized label, in document order; a field left with no symbols is
    /// exported as text.
    pub fn build(&self, document: &MappingDocument, column_order: &[String]) -> Result<ExportSchema> {
        let name = naming::encode(&self.node_name);
        if name.is_empty() || RESERVED_TYPE_NAMES.contains(&name.as_str()) {
            return Err(HarmonyError::Config(format!(
                "'{}' cannot be used as the record name",
                self.node_name
            )));
        }

        let mut seen_columns: HashSet<&str> = HashSet::new();
        let mut encoded_names: HashMap<String, &str> = HashMap::new();
        let mut fields = Vec::with_capacity(column_order.len());

        for (position, column) in column_order.iter().enumerate() {
            if column.is_empty() {
                return Err(HarmonyError::InvalidEncodedName {
                    name: String::new(),
                    reason: format!("column {} has an empty name", position + 1),
                });
            }
            if !seen_columns.insert(column) {
                return Err(HarmonyError::DuplicateColumn(column.clone()));
            }
            let descriptor = document
                .get(column)
                .ok_or_else(|| HarmonyError::UnknownColumn(column.clone()))?;

            let encoded = naming::encode(column);
            if let Some(first) = encoded_names.insert(encoded.clone(), column) {
                return Err(HarmonyError::NameCollision {
                    first: first.to_string(),
                    second: column.clone(),
                    encoded,
                });
            }

            let kind = field_kind(&encoded, descriptor);
            debug!("Export field '{}' as {:?}", encoded, kind);
            fields.push(ExportField {
                column: column.clone(),
                name: encoded,
                kind,
            });
        }

        let clash = fields.iter().any(|f| match &f.kind {
            FieldKind::Enum { type_name, .. } => *type_name == name,
            _ => false,
        });
        if clash {
            return Err(HarmonyError::Config(format!(
                "record name '{}' clashes with an enum type name",
                self.node_name
            )));
        }

        Ok(ExportSchema { name, fields })
    }
}

impl Default for ExportSchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn field_kind(encoded: &str, descriptor: &FieldDescriptor) -> FieldKind {
    match descriptor {
        FieldDescriptor::Int { .. } => FieldKind::Long,
        FieldDescriptor::Number { .. } | FieldDescriptor::String { .. } | FieldDescriptor::Empty { .. } => {
            FieldKind::Text
        }
        FieldDescriptor::Enum { values, .. } => {
            let mut symbols: Vec<String> = Vec::new();
            for value in values.iter().filter(|v| v.is_harmonized()) {
                let symbol = symbol_for(value);
                if !symbols.contains(&symbol) {
                    symbols.push(symbol);
                }
            }
            if symbols.is_empty() {
                FieldKind::Text
            } else {
                FieldKind::Enum {
                    // `_enum` never occurs in an encoded name
                    type_name: format!("{encoded}_enum"),
                    symbols,
                }
            }
        }
    }
}
