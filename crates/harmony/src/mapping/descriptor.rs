//! Field descriptors: the per-column entries of a mapping document.

use serde::{Deserialize, Serialize};

/// Free-text and registry annotations a curator attaches to a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Free-text description of the field.
    #[serde(default)]
    pub description: String,
    /// Identifier of the controlled data element in the registry.
    #[serde(default, rename = "registryId")]
    pub registry_id: String,
    /// Version of the registry data element.
    #[serde(default, rename = "registryVersion")]
    pub registry_version: String,
}

impl Annotation {
    /// Annotation with only a description.
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Set the registry identifier and version.
    pub fn with_registry(mut self, id: impl Into<String>, version: impl Into<String>) -> Self {
        self.registry_id = id.into();
        self.registry_version = version.into();
        self
    }

    /// Whether a registry identifier has been supplied.
    pub fn has_registry_id(&self) -> bool {
        !self.registry_id.trim().is_empty()
    }
}

/// One observed value of an enumerated field and its curation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    /// The verbatim string seen in the data.
    #[serde(default)]
    pub value: String,
    /// Free-text description of the value.
    #[serde(default)]
    pub description: String,
    /// Registry-sanctioned label the value harmonizes to.
    #[serde(default, rename = "harmonizedLabel")]
    pub harmonized_label: String,
    /// URI of the registry concept backing the label, blank if unknown.
    #[serde(default, rename = "conceptURI")]
    pub concept_uri: String,
}

impl EnumValue {
    /// A value with blank curation fields.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Set the harmonized label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.harmonized_label = label.into();
        self
    }

    /// Set the concept URI.
    pub fn with_concept_uri(mut self, uri: impl Into<String>) -> Self {
        self.concept_uri = uri.into();
        self
    }

    /// Whether a harmonized label has been supplied.
    pub fn is_harmonized(&self) -> bool {
        !self.harmonized_label.trim().is_empty()
    }

    /// The concept URI, if one is set.
    pub fn concept(&self) -> Option<&str> {
        let trimmed = self.concept_uri.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Inferred and curated description of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDescriptor {
    /// No values were observed.
    Empty { required: bool },
    /// Free text.
    String {
        required: bool,
        annotation: Annotation,
    },
    /// Whole numbers.
    Int {
        required: bool,
        range: Option<(i64, i64)>,
        annotation: Annotation,
    },
    /// Decimal numbers.
    Number {
        required: bool,
        range: Option<(f64, f64)>,
        annotation: Annotation,
    },
    /// A small set of repeated values, most frequent first.
    Enum {
        required: bool,
        values: Vec<EnumValue>,
        annotation: Annotation,
    },
}

impl FieldDescriptor {
    /// Whether every observed sample was non-blank.
    pub fn is_required(&self) -> bool {
        match self {
            FieldDescriptor::Empty { required }
            | FieldDescriptor::String { required, .. }
            | FieldDescriptor::Int { required, .. }
            | FieldDescriptor::Number { required, .. }
            | FieldDescriptor::Enum { required, .. } => *required,
        }
    }

    /// Curator annotations; `Empty` fields carry none.
    pub fn annotation(&self) -> Option<&Annotation> {
        match self {
            FieldDescriptor::Empty { .. } => None,
            FieldDescriptor::String { annotation, .. }
            | FieldDescriptor::Int { annotation, .. }
            | FieldDescriptor::Number { annotation, .. }
            | FieldDescriptor::Enum { annotation, .. } => Some(annotation),
        }
    }

    /// Mutable curator annotations.
    pub fn annotation_mut(&mut self) -> Option<&mut Annotation> {
        match self {
            FieldDescriptor::Empty { .. } => None,
            FieldDescriptor::String { annotation, .. }
            | FieldDescriptor::Int { annotation, .. }
            | FieldDescriptor::Number { annotation, .. }
            | FieldDescriptor::Enum { annotation, .. } => Some(annotation),
        }
    }

    /// Permissible values of an enumerated field.
    pub fn enum_values(&self) -> Option<&[EnumValue]> {
        match self {
            FieldDescriptor::Enum { values, .. } => Some(values),
            _ => None,
        }
    }

    /// Mutable permissible values of an enumerated field.
    pub fn enum_values_mut(&mut self) -> Option<&mut Vec<EnumValue>> {
        match self {
            FieldDescriptor::Enum { values, .. } => Some(values),
            _ => None,
        }
    }

    /// Name of the variant as written in the document `type` key.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldDescriptor::Empty { .. } => "null",
            FieldDescriptor::String { .. } => "string",
            FieldDescriptor::Int { .. } => "integer",
            FieldDescriptor::Number { .. } => "number",
            FieldDescriptor::Enum { .. } => "enum",
        }
    }
}
