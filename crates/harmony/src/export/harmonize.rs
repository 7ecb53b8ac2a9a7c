//! Cell-level harmonization shared by every output format.

use super::schema::symbol_for;
use crate::error::{HarmonyError, Result};
use crate::input::DataTable;
use crate::mapping::{EnumValue, FieldDescriptor, MappingDocument};

/// A harmonized cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datum {
    /// Parsed integer.
    Long(i64),
    /// Text, or a decimal number as written (trimmed).
    Text(String),
    /// Encoded harmonized label.
    Symbol(String),
}

impl Datum {
    /// The value as display text. Symbols are returned encoded.
    pub fn as_text(&self) -> String {
        match self {
            Datum::Long(n) => n.to_string(),
            Datum::Text(s) | Datum::Symbol(s) => s.clone(),
        }
    }
}

/// Resolves raw cells against a mapping document.
///
/// # Example
///
/// ```
/// use harmony::export::{Datum, HarmonizationMapper};
/// use harmony::mapping::{Annotation, EnumValue, FieldDescriptor, MappingDocument};
///
/// let mut document = MappingDocument::new();
/// document.insert("sex", FieldDescriptor::Enum {
///     required: true,
///     values: vec![EnumValue::new("F").with_label("Female")],
///     annotation: Annotation::default(),
/// }).unwrap();
///
/// let mapper = HarmonizationMapper::new(&document);
/// assert_eq!(mapper.map_value("sex", "F").unwrap(), Some(Datum::Symbol("Female".into())));
/// assert_eq!(mapper.map_value("sex", "").unwrap(), None);
/// ```
pub struct HarmonizationMapper<'a> {
    document: &'a MappingDocument,
}

impl<'a> HarmonizationMapper<'a> {
    /// Create a mapper over a curated document.
    pub fn new(document: &'a MappingDocument) -> Self {
        Self { document }
    }

    /// Harmonize one cell of `column`. Blank cells are always `None`.
    pub fn map_value(&self, column: &str, verbatim: &str) -> Result<Option<Datum>> {
        let descriptor = self.descriptor(column)?;
        if DataTable::is_blank(verbatim) {
            return Ok(None);
        }

        match descriptor {
            FieldDescriptor::Int { .. } => {
                let trimmed = verbatim.trim();
                trimmed
                    .parse::<i64>()
                    .map(|n| Some(Datum::Long(n)))
                    .map_err(|_| coercion_error(column, verbatim, "integer"))
            }
            FieldDescriptor::Number { .. } => {
                let trimmed = verbatim.trim();
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(Some(Datum::Text(trimmed.to_string()))),
                    _ => Err(coercion_error(column, verbatim, "number")),
                }
            }
            FieldDescriptor::String { .. } | FieldDescriptor::Empty { .. } => {
                Ok(Some(Datum::Text(verbatim.to_string())))
            }
            FieldDescriptor::Enum { values, .. } => match self.lookup(column, verbatim)? {
                Some(matched) => Ok(Some(Datum::Symbol(symbol_for(matched)))),
                // Columns without any harmonized label are exported as text
                None if !values.iter().any(|v| v.is_harmonized()) => {
                    Ok(Some(Datum::Text(verbatim.to_string())))
                }
                None => Ok(None),
            },
        }
    }

    /// The curated entry matching a cell of an enum column.
    ///
    /// Returns `None` for blank cells, non-enum columns and values the
    /// document does not list. A listed value without a harmonized label is
    /// an [`HarmonyError::UnmappedValue`]; a value listed more than once is an
    /// [`HarmonyError::AmbiguousMapping`].
    pub fn lookup(&self, column: &str, verbatim: &str) -> Result<Option<&'a EnumValue>> {
        let Some(values) = self.descriptor(column)?.enum_values() else {
            return Ok(None);
        };
        if DataTable::is_blank(verbatim) {
            return Ok(None);
        }

        let mut matches = values.iter().filter(|v| v.value == verbatim);
        let Some(first) = matches.next() else {
            return Ok(None);
        };
        let extra = matches.count();
        if extra > 0 {
            return Err(HarmonyError::AmbiguousMapping {
                column: column.to_string(),
                value: verbatim.to_string(),
                matches: extra + 1,
            });
        }
        if !first.is_harmonized() {
            return Err(HarmonyError::UnmappedValue {
                column: column.to_string(),
                value: verbatim.to_string(),
            });
        }
        Ok(Some(first))
    }

    fn descriptor(&self, column: &str) -> Result<&'a FieldDescriptor> {
        self.document
            .get(column)
            .ok_or_else(|| HarmonyError::UnknownColumn(column.to_string()))
    }
}

fn coercion_error(column: &str, value: &str, expected: &'static str) -> HarmonyError {
    HarmonyError::TypeCoercionError {
        column: column.to_string(),
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Annotation;

    fn document() -> MappingDocument {
        let mut doc = MappingDocument::new();
        doc.insert(
            "color",
            FieldDescriptor::Enum {
                required: false,
                values: vec![
                    EnumValue::new("red").with_label("Red_NCIT"),
                    EnumValue::new("blue").with_label("Blue NCIT"),
                    EnumValue::new("green"),
                    EnumValue::new("teal").with_label("Teal"),
                    EnumValue::new("teal").with_label("Cyan"),
                ],
                annotation: Annotation::default(),
            },
        )
        .unwrap();
        doc.insert(
            "age",
            FieldDescriptor::Int {
                required: true,
                range: Some((1, 30)),
                annotation: Annotation::default(),
            },
        )
        .unwrap();
        doc.insert(
            "weight",
            FieldDescriptor::Number {
                required: true,
                range: None,
                annotation: Annotation::default(),
            },
        )
        .unwrap();
        doc.insert(
            "note",
            FieldDescriptor::String {
                required: false,
                annotation: Annotation::default(),
            },
        )
        .unwrap();
        doc.insert(
            "site",
            FieldDescriptor::Enum {
                required: true,
                values: vec![EnumValue::new("A")],
                annotation: Annotation::default(),
            },
        )
        .unwrap();
        doc
    }

    #[test]
    fn test_enum_symbols_are_encoded_labels() {
        let doc = document();
        let mapper = HarmonizationMapper::new(&doc);
        assert_eq!(
            mapper.map_value("color", "red").unwrap(),
            Some(Datum::Symbol("Red_5f_NCIT".to_string()))
        );
        assert_eq!(
            mapper.map_value("color", "blue").unwrap(),
            Some(Datum::Symbol("Blue_20_NCIT".to_string()))
        );
    }

    #[test]
    fn test_enum_match_is_exact() {
        let doc = document();
        let mapper = HarmonizationMapper::new(&doc);
        assert_eq!(mapper.map_value("color", "Red").unwrap(), None);
        assert_eq!(mapper.map_value("color", "purple").unwrap(), None);
    }

    #[test]
    fn test_unmapped_value_is_fatal() {
        let doc = document();
        let err = HarmonizationMapper::new(&doc)
            .map_value("color", "green")
            .unwrap_err();
        assert!(matches!(
            err,
            HarmonyError::UnmappedValue { ref column, ref value } if column == "color" && value == "green"
        ));
    }

    #[test]
    fn test_ambiguous_mapping_is_fatal() {
        let doc = document();
        let err = HarmonizationMapper::new(&doc)
            .map_value("color", "teal")
            .unwrap_err();
        assert!(matches!(err, HarmonyError::AmbiguousMapping { matches: 2, .. }));
    }

    #[test]
    fn test_blank_cells_are_null() {
        let doc = document();
        let mapper = HarmonizationMapper::new(&doc);
        for column in ["color", "age", "weight", "note", "site"] {
            assert_eq!(mapper.map_value(column, "").unwrap(), None);
            assert_eq!(mapper.map_value(column, "   ").unwrap(), None);
        }
    }

    #[test]
    fn test_int_coercion() {
        let doc = document();
        let mapper = HarmonizationMapper::new(&doc);
        assert_eq!(mapper.map_value("age", " 30 ").unwrap(), Some(Datum::Long(30)));
        assert_eq!(mapper.map_value("age", "-4").unwrap(), Some(Datum::Long(-4)));

        let err = mapper.map_value("age", "x").unwrap_err();
        assert!(matches!(
            err,
            HarmonyError::TypeCoercionError { expected: "integer", ref value, .. } if value == "x"
        ));
        assert!(mapper.map_value("age", "1.5").is_err());
    }

    #[test]
    fn test_number_kept_as_written() {
        let doc = document();
        let mapper = HarmonizationMapper::new(&doc);
        assert_eq!(
            mapper.map_value("weight", " 70.250 ").unwrap(),
            Some(Datum::Text("70.250".to_string()))
        );
        assert!(mapper.map_value("weight", "heavy").is_err());
        assert!(mapper.map_value("weight", "inf").is_err());
    }

    #[test]
    fn test_text_passes_through() {
        let doc = document();
        let mapper = HarmonizationMapper::new(&doc);
        assert_eq!(
            mapper.map_value("note", " as written ").unwrap(),
            Some(Datum::Text(" as written ".to_string()))
        );
    }

    #[test]
    fn test_enum_without_labels_exports_text() {
        let doc = document();
        let mapper = HarmonizationMapper::new(&doc);
        assert_eq!(
            mapper.map_value("site", "B").unwrap(),
            Some(Datum::Text("B".to_string()))
        );
        assert!(matches!(
            mapper.map_value("site", "A"),
            Err(HarmonyError::UnmappedValue { .. })
        ));
    }

    #[test]
    fn test_unknown_column() {
        let doc = document();
        let mapper = HarmonizationMapper::new(&doc);
        assert!(matches!(
            mapper.map_value("height", "1"),
            Err(HarmonyError::UnknownColumn(_))
        ));
        assert!(matches!(
            mapper.lookup("height", "1"),
            Err(HarmonyError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_lookup_returns_curated_entry() {
        let doc = document();
        let mapper = HarmonizationMapper::new(&doc);
        let entry = mapper.lookup("color", "red").unwrap().unwrap();
        assert_eq!(entry.harmonized_label, "Red_NCIT");
        assert!(mapper.lookup("age", "3").unwrap().is_none());
    }
}
