//! Field classification from observed sample values.

use indexmap::IndexMap;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::input::DataTable;
use crate::mapping::{Annotation, EnumValue, FieldDescriptor, MappingDocument};

/// Default ratio of unique to non-blank values below which a field is an enum.
pub const DEFAULT_ENUM_PROPORTION: f64 = 0.1;

// Absolute URIs embedded in free text, e.g. "Female (http://purl.obolibrary.org/obo/PATO_0000383)".
static URI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[A-Za-z][A-Za-z0-9+.\-]*://[^\s<>"'()\[\]{},;|]+"#)
        .expect("URI pattern is valid")
});

/// Classifier configuration.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// A field is an enum when `unique < non_blank * enum_proportion`.
    pub enum_proportion: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enum_proportion: DEFAULT_ENUM_PROPORTION,
        }
    }
}

/// Decides the descriptor of a column from its sample values.
///
/// Rules are tried in a fixed order and the first match wins:
///
/// 1. no non-blank values: `Empty`
/// 2. `unique < non_blank * enum_proportion`: `Enum`
/// 3. every character an ASCII digit or `-`: `Int`
/// 4. every character an ASCII digit, `-` or `.`: `Number`
/// 5. otherwise `String`
///
/// A field is required when none of its samples is blank.
pub struct FieldClassifier {
    config: ClassifierConfig,
}

impl FieldClassifier {
    /// Create a classifier with default settings.
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
        }
    }

    /// Create a classifier with custom settings.
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify one column.
    pub fn classify<S: AsRef<str>>(&self, name: &str, values: &[S]) -> FieldDescriptor {
        let required = !values.iter().any(|v| DataTable::is_blank(v.as_ref()));
        let non_blank: Vec<&str> = values
            .iter()
            .map(|v| v.as_ref())
            .filter(|v| !DataTable::is_blank(v))
            .collect();

        // Insertion order doubles as first-occurrence order for tie breaks
        let mut value_counts: IndexMap<&str, usize> = IndexMap::new();
        for v in &non_blank {
            *value_counts.entry(*v).or_insert(0) += 1;
        }

        let unique_count = value_counts.len();
        let sample_count = non_blank.len();

        let descriptor = if unique_count == 0 {
            FieldDescriptor::Empty { required }
        } else if (unique_count as f64) < sample_count as f64 * self.config.enum_proportion {
            let mut ranked: Vec<(&str, usize)> = value_counts.into_iter().collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1));
            let values = ranked
                .into_iter()
                .map(|(value, _)| {
                    let mut entry = EnumValue::new(value);
                    if let Some(uri) = detect_concept_uri(value) {
                        entry.concept_uri = uri;
                    }
                    entry
                })
                .collect();
            FieldDescriptor::Enum {
                required,
                values,
                annotation: Annotation::default(),
            }
        } else if all_chars(&non_blank, |c| c.is_ascii_digit() || c == '-') {
            FieldDescriptor::Int {
                required,
                range: int_range(&non_blank),
                annotation: Annotation::default(),
            }
        } else if all_chars(&non_blank, |c| c.is_ascii_digit() || c == '-' || c == '.') {
            FieldDescriptor::Number {
                required,
                range: number_range(&non_blank),
                annotation: Annotation::default(),
            }
        } else {
            FieldDescriptor::String {
                required,
                annotation: Annotation::default(),
            }
        };

        debug!(
            "Column '{}': {} ({} unique of {} non-blank, required={})",
            name,
            descriptor.type_name(),
            unique_count,
            sample_count,
            required
        );
        descriptor
    }

    /// Classify every column of a table into a new mapping document.
    pub fn classify_table(&self, table: &DataTable) -> Result<MappingDocument> {
        let mut document = MappingDocument::new();
        for (index, header) in table.headers.iter().enumerate() {
            let values: Vec<&str> = table.column_values(index).collect();
            document.insert(header.clone(), self.classify(header, &values))?;
        }
        info!(
            "Classified {} column(s) over {} row(s)",
            document.len(),
            table.row_count()
        );
        Ok(document)
    }
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// The last absolute URI embedded in a value, if any.
pub fn detect_concept_uri(value: &str) -> Option<String> {
    URI_PATTERN
        .find_iter(value)
        .last()
        .map(|m| m.as_str().trim_end_matches(['.', ':']).to_string())
}

fn all_chars(values: &[&str], accept: impl Fn(char) -> bool) -> bool {
    values.iter().all(|v| v.chars().all(&accept))
}

fn int_range(values: &[&str]) -> Option<(i64, i64)> {
    values
        .iter()
        .filter_map(|v| v.parse::<i64>().ok())
        .fold(None, |range, n| match range {
            None => Some((n, n)),
            Some((min, max)) => Some((min.min(n), max.max(n))),
        })
}

fn number_range(values: &[&str]) -> Option<(f64, f64)> {
    values
        .iter()
        .filter_map(|v| v.parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .fold(None, |range, n| match range {
            None => Some((n, n)),
            Some((min, max)) => Some((min.min(n), max.max(n))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(descriptor: &FieldDescriptor) -> Vec<&str> {
        descriptor
            .enum_values()
            .unwrap()
            .iter()
            .map(|v| v.value.as_str())
            .collect()
    }

    /// `total` samples cycling through `unique` distinct non-numeric values.
    fn cycled(unique: usize, total: usize) -> Vec<String> {
        (0..total).map(|i| format!("level{}", i % unique)).collect()
    }

    #[test]
    fn test_enum_threshold_boundary() {
        let classifier = FieldClassifier::new();

        let nine = classifier.classify("grade", &cycled(9, 100));
        assert!(matches!(nine, FieldDescriptor::Enum { .. }));

        let ten = classifier.classify("grade", &cycled(10, 100));
        assert!(matches!(ten, FieldDescriptor::String { .. }));

        let eleven = classifier.classify("grade", &cycled(11, 100));
        assert!(matches!(eleven, FieldDescriptor::String { .. }));
    }

    #[test]
    fn test_enum_ordering_by_count_then_first_occurrence() {
        let mut values = vec!["b", "a", "c", "a", "c", "b", "d"];
        values.extend(std::iter::repeat_n("c", 40));
        let config = ClassifierConfig {
            enum_proportion: 0.5,
        };
        let descriptor = FieldClassifier::with_config(config).classify("x", &values);
        // c=42, b=2, a=2 (b seen first), d=1
        assert_eq!(labels(&descriptor), vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn test_int_with_range() {
        let descriptor = FieldClassifier::new().classify("n", &["1", "2", "30"]);
        assert_eq!(
            descriptor,
            FieldDescriptor::Int {
                required: true,
                range: Some((1, 30)),
                annotation: Annotation::default(),
            }
        );
    }

    #[test]
    fn test_negative_ints_and_numbers() {
        let descriptor = FieldClassifier::new().classify("n", &["-5", "7", "12"]);
        assert!(matches!(
            descriptor,
            FieldDescriptor::Int {
                range: Some((-5, 12)),
                ..
            }
        ));

        let descriptor = FieldClassifier::new().classify("w", &["1.5", "-2.25", "3"]);
        assert!(matches!(
            descriptor,
            FieldDescriptor::Number {
                range: Some((min, max)),
                ..
            } if min == -2.25 && max == 3.0
        ));
    }

    #[test]
    fn test_dash_only_int_has_no_range() {
        let descriptor = FieldClassifier::new().classify("n", &["-", "--", "---"]);
        assert!(matches!(
            descriptor,
            FieldDescriptor::Int { range: None, .. }
        ));
    }

    #[test]
    fn test_string_fallback() {
        let descriptor = FieldClassifier::new().classify("s", &["a1", "b2", "1e5"]);
        assert!(matches!(descriptor, FieldDescriptor::String { .. }));
    }

    #[test]
    fn test_empty_column() {
        let descriptor = FieldClassifier::new().classify("e", &["", "  ", ""]);
        assert_eq!(descriptor, FieldDescriptor::Empty { required: false });

        let none: [&str; 0] = [];
        let descriptor = FieldClassifier::new().classify("e", &none);
        assert_eq!(descriptor, FieldDescriptor::Empty { required: true });
    }

    #[test]
    fn test_required_flag() {
        let classifier = FieldClassifier::new();
        assert!(classifier.classify("a", &["1", "2", "3"]).is_required());
        assert!(!classifier.classify("a", &["1", " ", "3"]).is_required());
        assert!(!classifier.classify("a", &["1", "", "3"]).is_required());
    }

    #[test]
    fn test_concept_uri_detection() {
        assert_eq!(
            detect_concept_uri("Female (http://purl.obolibrary.org/obo/PATO_0000383)"),
            Some("http://purl.obolibrary.org/obo/PATO_0000383".to_string())
        );
        assert_eq!(
            detect_concept_uri("see https://a.org/x or https://b.org/y."),
            Some("https://b.org/y".to_string())
        );
        assert_eq!(detect_concept_uri("plain text"), None);
    }

    #[test]
    fn test_enum_values_pick_up_embedded_uris() {
        let mut values = vec!["Male http://example.org/M"; 30];
        values.push("Female");
        let descriptor = FieldClassifier::new().classify("sex", &values);
        let entries = descriptor.enum_values().unwrap();
        assert_eq!(entries[0].concept_uri, "http://example.org/M");
        assert_eq!(entries[1].concept_uri, "");
    }

    #[test]
    fn test_classify_table_rejects_duplicate_headers() {
        let table = DataTable::new(
            vec!["a".to_string(), "a".to_string()],
            vec![vec!["1".to_string(), "2".to_string()]],
            b',',
        );
        let err = FieldClassifier::new().classify_table(&table).unwrap_err();
        assert!(matches!(err, crate::HarmonyError::DuplicateColumn(_)));
    }
}
