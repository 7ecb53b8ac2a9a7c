//! Harmonized export as a JSON-LD graph.

use std::io::Write;
use std::path::Path;

use log::info;
use serde_json::{Map, Number, Value, json};

use super::harmonize::{Datum, HarmonizationMapper};
use super::naming;
use crate::atomic::write_atomically;
use crate::error::{HarmonyError, Result};
use crate::input::DataTable;
use crate::mapping::{FieldDescriptor, MappingDocument};

const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// Base IRIs for row nodes and column properties.
#[derive(Debug, Clone)]
pub struct LinkedDataConfig {
    /// Row nodes are identified as `<base_uri>/row<i>`.
    pub base_uri: String,
    /// Vocabulary that column properties are resolved against.
    pub vocab_uri: String,
}

impl Default for LinkedDataConfig {
    fn default() -> Self {
        Self::with_base_uri("http://example.org/harmony")
    }
}

impl LinkedDataConfig {
    /// Config rooted at `base_uri`, with the vocabulary under `<base_uri>/vocab#`.
    pub fn with_base_uri(base_uri: impl Into<String>) -> Self {
        let base_uri = base_uri.into().trim_end_matches('/').to_string();
        Self {
            vocab_uri: format!("{base_uri}/vocab#"),
            base_uri,
        }
    }

    /// IRI of the row at `index`.
    pub fn row_iri(&self, index: usize) -> String {
        format!("{}/row{}", self.base_uri, index)
    }
}

/// Writes a table as one JSON-LD node per row.
pub struct LinkedDataWriter {
    config: LinkedDataConfig,
}

impl LinkedDataWriter {
    /// Writer with the given base IRIs.
    pub fn new(config: LinkedDataConfig) -> Self {
        Self { config }
    }

    /// Build the JSON-LD document for `table`.
    ///
    /// Property keys are encoded column names. Enum cells become
    /// `{"@id": conceptURI, "label": harmonizedLabel}`, or the bare label when
    /// no concept is curated. Blank cells are omitted.
    pub fn to_graph(&self, document: &MappingDocument, table: &DataTable) -> Result<Value> {
        let mapper = HarmonizationMapper::new(document);
        let keys: Vec<String> = table.headers.iter().map(|h| naming::encode(h)).collect();

        let mut graph = Vec::with_capacity(table.row_count());
        for (index, row) in table.rows.iter().enumerate() {
            let mut node = Map::new();
            node.insert("@id".to_string(), Value::String(self.config.row_iri(index)));

            for (position, column) in table.headers.iter().enumerate() {
                let cell = row.get(position).map(String::as_str).unwrap_or("");
                let Some(datum) = mapper.map_value(column, cell)? else {
                    continue;
                };
                let value = match datum {
                    Datum::Long(n) => Value::from(n),
                    Datum::Symbol(_) => match mapper.lookup(column, cell)? {
                        Some(entry) => match entry.concept() {
                            Some(uri) => json!({"@id": uri, "label": entry.harmonized_label}),
                            None => Value::String(entry.harmonized_label.clone()),
                        },
                        None => Value::Null,
                    },
                    Datum::Text(text) => match document.get(column) {
                        Some(FieldDescriptor::Number { .. }) => number(column, &text)?,
                        _ => Value::String(text),
                    },
                };
                node.insert(keys[position].clone(), value);
            }
            graph.push(Value::Object(node));
        }

        Ok(json!({
            "@context": {
                "@base": format!("{}/", self.config.base_uri),
                "@vocab": self.config.vocab_uri,
                "label": RDFS_LABEL,
            },
            "@graph": graph,
        }))
    }

    /// Write the JSON-LD document to `path`. Returns the number of row nodes.
    pub fn write(
        &self,
        path: impl AsRef<Path>,
        document: &MappingDocument,
        table: &DataTable,
    ) -> Result<usize> {
        let path = path.as_ref();
        let graph = self.to_graph(document, table)?;
        write_atomically(path, |out| {
            serde_json::to_writer_pretty(&mut *out, &graph)?;
            out.write_all(b"\n").map_err(|e| HarmonyError::io(path, e))
        })?;
        info!("Wrote {} node(s) to '{}'", table.row_count(), path.display());
        Ok(table.row_count())
    }
}

impl Default for LinkedDataWriter {
    fn default() -> Self {
        Self::new(LinkedDataConfig::default())
    }
}

/// A decimal cell as a JSON number.
fn number(column: &str, text: &str) -> Result<Value> {
    if let Ok(n) = text.parse::<Number>() {
        return Ok(Value::Number(n));
    }
    // Forms Rust accepts but JSON does not, such as "5." or ".5"
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| HarmonyError::TypeCoercionError {
            column: column.to_string(),
            value: text.to_string(),
            expected: "number",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{Annotation, EnumValue};

    fn fixture() -> (MappingDocument, DataTable) {
        let mut doc = MappingDocument::new();
        doc.insert(
            "sex",
            FieldDescriptor::Enum {
                required: true,
                values: vec![
                    EnumValue::new("F")
                        .with_label("Female")
                        .with_concept_uri("http://purl.obolibrary.org/obo/PATO_0000383"),
                    EnumValue::new("M").with_label("Male"),
                ],
                annotation: Annotation::default(),
            },
        )
        .unwrap();
        doc.insert(
            "body mass",
            FieldDescriptor::Number {
                required: false,
                range: None,
                annotation: Annotation::default(),
            },
        )
        .unwrap();
        doc.insert(
            "age",
            FieldDescriptor::Int {
                required: true,
                range: None,
                annotation: Annotation::default(),
            },
        )
        .unwrap();
        let table = DataTable::new(
            vec!["sex".to_string(), "body mass".to_string(), "age".to_string()],
            vec![
                vec!["F".to_string(), "61.5".to_string(), "40".to_string()],
                vec!["M".to_string(), "".to_string(), "7".to_string()],
            ],
            b',',
        );
        (doc, table)
    }

    #[test]
    fn test_row_iris() {
        let config = LinkedDataConfig::with_base_uri("https://data.example/study/");
        assert_eq!(config.row_iri(3), "https://data.example/study/row3");
        assert_eq!(config.vocab_uri, "https://data.example/study/vocab#");
    }

    #[test]
    fn test_graph_nodes() {
        let (doc, table) = fixture();
        let graph = LinkedDataWriter::default().to_graph(&doc, &table).unwrap();

        assert_eq!(graph["@context"]["label"], RDFS_LABEL);
        let nodes = graph["@graph"].as_array().unwrap();
        assert_eq!(nodes.len(), 2);

        assert_eq!(nodes[0]["@id"], "http://example.org/harmony/row0");
        assert_eq!(
            nodes[0]["sex"],
            json!({"@id": "http://purl.obolibrary.org/obo/PATO_0000383", "label": "Female"})
        );
        assert_eq!(nodes[0]["body_20_mass"], json!(61.5));
        assert_eq!(nodes[0]["age"], json!(40));

        assert_eq!(nodes[1]["sex"], "Male");
        assert!(nodes[1].get("body_20_mass").is_none());
    }

    #[test]
    fn test_lenient_decimal_forms() {
        assert_eq!(number("x", "5.").unwrap(), json!(5.0));
        assert!(number("x", "abc").is_err());
    }

    #[test]
    fn test_write_pretty_json() {
        let (doc, table) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonld");

        let nodes = LinkedDataWriter::default().write(&path, &doc, &table).unwrap();
        assert_eq!(nodes, 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["@graph"][1]["age"], json!(7));
    }
}
