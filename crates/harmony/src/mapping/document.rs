//! The mapping document and its JSON form.

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value, json};

use super::descriptor::{Annotation, EnumValue, FieldDescriptor};
use crate::error::{HarmonyError, Result};

/// Ordered, uniquely named field descriptors for one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingDocument {
    /// Optional free-text title for the dataset.
    pub title: Option<String>,
    fields: IndexMap<String, FieldDescriptor>,
}

impl MappingDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a field. Field names must be unique.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Result<()> {
        let name = name.into();
        if self.fields.contains_key(&name) {
            return Err(HarmonyError::DuplicateColumn(name));
        }
        self.fields.insert(name, descriptor);
        Ok(())
    }

    /// Look up a field by column name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Look up a field for editing.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldDescriptor> {
        self.fields.get_mut(name)
    }

    /// Column names in document order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    /// Fields in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fields in document order, for editing.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut FieldDescriptor)> {
        self.fields.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of fields that had no blank samples.
    pub fn required_columns(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, field)| field.is_required())
            .map(|(name, _)| name)
            .collect()
    }

    /// How far curation of this document has progressed.
    pub fn progress(&self) -> CurationProgress {
        let mut progress = CurationProgress {
            fields: self.len(),
            ..CurationProgress::default()
        };
        for (_, field) in self.iter() {
            if let Some(annotation) = field.annotation() {
                if !annotation.description.trim().is_empty() {
                    progress.described_fields += 1;
                }
                if annotation.has_registry_id() {
                    progress.registered_fields += 1;
                }
            }
            if let Some(values) = field.enum_values() {
                progress.enum_fields += 1;
                progress.enum_values += values.len();
                progress.harmonized_values += values.iter().filter(|v| v.is_harmonized()).count();
                progress.values_with_concepts +=
                    values.iter().filter(|v| v.concept().is_some()).count();
            }
        }
        progress
    }

    /// Render the document in its on-disk JSON form.
    pub fn to_document_form(&self) -> Value {
        let mut properties = Map::new();
        for (name, field) in self.iter() {
            properties.insert(name.to_string(), descriptor_to_value(field));
        }

        let mut document = Map::new();
        if let Some(title) = &self.title {
            document.insert("title".to_string(), Value::String(title.clone()));
        }
        document.insert("type".to_string(), Value::String("object".to_string()));
        document.insert("properties".to_string(), Value::Object(properties));
        document.insert("required".to_string(), json!(self.required_columns()));
        Value::Object(document)
    }

    /// Read a document from its on-disk JSON form.
    ///
    /// Missing optional keys default to blank; a field entry that is not an
    /// object of a known `type` is a [`HarmonyError::MalformedDocument`].
    pub fn from_document_form(value: &Value) -> Result<Self> {
        let root = value.as_object().ok_or_else(|| malformed("$", "document is not an object"))?;

        let title = match root.get("title") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(malformed("title", "expected a string")),
        };

        let properties = root
            .get("properties")
            .ok_or_else(|| malformed("properties", "missing"))?
            .as_object()
            .ok_or_else(|| malformed("properties", "expected an object"))?;

        let required: Vec<String> = match root.get("required") {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| malformed("required", &e.to_string()))?,
        };

        for name in &required {
            if !properties.contains_key(name) {
                warn!("Ignoring required column '{name}' with no entry in properties");
            }
        }

        let mut document = MappingDocument {
            title,
            fields: IndexMap::with_capacity(properties.len()),
        };
        for (name, entry) in properties {
            let is_required = required.iter().any(|r| r == name);
            let descriptor = descriptor_from_value(name, entry, is_required)?;
            document.fields.insert(name.clone(), descriptor);
        }
        Ok(document)
    }
}

/// Counts describing how much of a document has been curated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurationProgress {
    /// Total fields.
    pub fields: usize,
    /// Fields with a non-blank description.
    pub described_fields: usize,
    /// Fields with a registry identifier.
    pub registered_fields: usize,
    /// Enumerated fields.
    pub enum_fields: usize,
    /// Permissible values across all enumerated fields.
    pub enum_values: usize,
    /// Permissible values with a harmonized label.
    pub harmonized_values: usize,
    /// Permissible values with a concept URI.
    pub values_with_concepts: usize,
}

impl CurationProgress {
    /// Whether every permissible value has a harmonized label.
    pub fn is_export_ready(&self) -> bool {
        self.harmonized_values == self.enum_values
    }
}

/// Field entry as it appears on disk; every key is optional except `type`.
#[derive(Debug, Deserialize)]
struct RawField {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    description: String,
    #[serde(default, rename = "registryId")]
    registry_id: String,
    #[serde(default, rename = "registryVersion")]
    registry_version: String,
    #[serde(default)]
    minimum: Option<Number>,
    #[serde(default)]
    maximum: Option<Number>,
    #[serde(default, rename = "permissibleValues")]
    permissible_values: Vec<EnumValue>,
}

fn malformed(field: &str, reason: &str) -> HarmonyError {
    HarmonyError::MalformedDocument {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn descriptor_from_value(name: &str, entry: &Value, required: bool) -> Result<FieldDescriptor> {
    if !entry.is_object() {
        return Err(malformed(name, "field entry is not an object"));
    }
    let raw: RawField =
        serde_json::from_value(entry.clone()).map_err(|e| malformed(name, &e.to_string()))?;

    let annotation = Annotation {
        description: raw.description,
        registry_id: raw.registry_id,
        registry_version: raw.registry_version,
    };

    let descriptor = match raw.kind.as_str() {
        "null" => FieldDescriptor::Empty { required },
        "string" => FieldDescriptor::String {
            required,
            annotation,
        },
        "integer" => {
            let bound = |n: Option<Number>, key: &str| -> Result<Option<i64>> {
                n.map(|n| {
                    n.as_i64()
                        .ok_or_else(|| malformed(name, &format!("{key} is not an integer")))
                })
                .transpose()
            };
            let range = match (bound(raw.minimum, "minimum")?, bound(raw.maximum, "maximum")?) {
                (Some(min), Some(max)) => Some((min, max)),
                _ => None,
            };
            FieldDescriptor::Int {
                required,
                range,
                annotation,
            }
        }
        "number" => {
            let range = match (
                raw.minimum.and_then(|n| n.as_f64()),
                raw.maximum.and_then(|n| n.as_f64()),
            ) {
                (Some(min), Some(max)) => Some((min, max)),
                _ => None,
            };
            FieldDescriptor::Number {
                required,
                range,
                annotation,
            }
        }
        "enum" => FieldDescriptor::Enum {
            required,
            values: raw.permissible_values,
            annotation,
        },
        other => return Err(malformed(name, &format!("unknown type '{other}'"))),
    };
    Ok(descriptor)
}

fn annotated(kind: &str, annotation: &Annotation) -> Map<String, Value> {
    let mut entry = Map::new();
    entry.insert("type".to_string(), Value::String(kind.to_string()));
    entry.insert(
        "description".to_string(),
        Value::String(annotation.description.clone()),
    );
    entry.insert(
        "registryId".to_string(),
        Value::String(annotation.registry_id.clone()),
    );
    entry.insert(
        "registryVersion".to_string(),
        Value::String(annotation.registry_version.clone()),
    );
    entry
}

fn descriptor_to_value(field: &FieldDescriptor) -> Value {
    let entry = match field {
        FieldDescriptor::Empty { .. } => {
            let mut entry = Map::new();
            entry.insert("type".to_string(), Value::String("null".to_string()));
            entry
        }
        FieldDescriptor::String { annotation, .. } => annotated(field.type_name(), annotation),
        FieldDescriptor::Int {
            range, annotation, ..
        } => {
            let mut entry = annotated(field.type_name(), annotation);
            if let Some((min, max)) = range {
                entry.insert("minimum".to_string(), json!(min));
                entry.insert("maximum".to_string(), json!(max));
            }
            entry
        }
        FieldDescriptor::Number {
            range, annotation, ..
        } => {
            let mut entry = annotated(field.type_name(), annotation);
            if let Some((min, max)) = range {
                entry.insert("minimum".to_string(), json!(min));
                entry.insert("maximum".to_string(), json!(max));
            }
            entry
        }
        FieldDescriptor::Enum {
            values, annotation, ..
        } => {
            let mut entry = annotated(field.type_name(), annotation);
            entry.insert("permissibleValues".to_string(), json!(values));
            entry
        }
    };
    Value::Object(entry)
}
