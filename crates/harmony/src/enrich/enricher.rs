//! Filling blank curation fields from a terminology service.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use serde::Serialize;

use super::lookup::{Term, TermLookup};
use crate::error::Result;
use crate::mapping::{EnumValue, MappingDocument};

/// What an enrichment pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentReport {
    /// Requests sent to the lookup service.
    pub lookups: usize,
    /// Field descriptions filled from registry identifiers.
    pub fields_described: usize,
    /// Enum values given a concept IRI.
    pub concepts_added: usize,
    /// Enum values given a harmonized label.
    pub labels_added: usize,
    /// Enum values given a description.
    pub descriptions_added: usize,
    /// Queries the service had no term for.
    pub unmatched: Vec<String>,
}

impl EnrichmentReport {
    /// Whether anything in the document changed.
    pub fn changed(&self) -> bool {
        self.fields_described + self.concepts_added + self.labels_added + self.descriptions_added > 0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
enum Query {
    Label(String),
    Identifier(String),
}

/// Fills blank descriptions, concept IRIs and harmonized labels.
///
/// Curated values are never overwritten. Lookup failures abort the pass;
/// fields already filled in this pass stay filled in the document.
pub struct Enricher {
    lookup: Arc<dyn TermLookup>,
}

impl Enricher {
    /// Create an enricher backed by `lookup`.
    pub fn new(lookup: impl TermLookup + 'static) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    /// Create an enricher sharing an existing lookup.
    pub fn shared(lookup: Arc<dyn TermLookup>) -> Self {
        Self { lookup }
    }

    /// Enrich `document` in place.
    pub fn enrich(&self, document: &mut MappingDocument) -> Result<EnrichmentReport> {
        let mut report = EnrichmentReport::default();
        let mut cache: HashMap<Query, Option<Term>> = HashMap::new();

        for (column, field) in document.iter_mut() {
            if let Some(annotation) = field.annotation_mut() {
                if annotation.has_registry_id() && annotation.description.trim().is_empty() {
                    let query = Query::Identifier(annotation.registry_id.trim().to_string());
                    if let Some(term) = self.resolve(query, &mut cache, &mut report)? {
                        annotation.description = if term.description.is_empty() {
                            term.label
                        } else {
                            term.description
                        };
                        report.fields_described += 1;
                        debug!("Described column '{}' from registry", column);
                    }
                }
            }

            let Some(values) = field.enum_values_mut() else {
                continue;
            };
            for value in values.iter_mut().filter(|v| needs_enrichment(v)) {
                let query = match value.concept() {
                    Some(uri) => Query::Identifier(uri.to_string()),
                    None => Query::Label(value.value.trim().to_string()),
                };
                if let Some(term) = self.resolve(query, &mut cache, &mut report)? {
                    fill(value, term, &mut report);
                }
            }
        }

        info!(
            "Enrichment via {}: {} lookup(s), {} concept(s), {} label(s), {} description(s)",
            self.lookup.name(),
            report.lookups,
            report.concepts_added,
            report.labels_added,
            report.descriptions_added + report.fields_described
        );
        Ok(report)
    }

    fn resolve(
        &self,
        query: Query,
        cache: &mut HashMap<Query, Option<Term>>,
        report: &mut EnrichmentReport,
    ) -> Result<Option<Term>> {
        if let Some(cached) = cache.get(&query) {
            return Ok(cached.clone());
        }

        report.lookups += 1;
        let (text, term) = match &query {
            Query::Label(label) => (label.clone(), self.lookup.lookup_label(label)?),
            Query::Identifier(id) => (id.clone(), self.lookup.lookup_identifier(id)?),
        };
        if term.is_none() {
            report.unmatched.push(text);
        }
        cache.insert(query, term.clone());
        Ok(term)
    }
}

fn needs_enrichment(value: &EnumValue) -> bool {
    !value.value.trim().is_empty()
        && (value.concept().is_none()
            || !value.is_harmonized()
            || value.description.trim().is_empty())
}

fn fill(value: &mut EnumValue, term: Term, report: &mut EnrichmentReport) {
    if value.concept().is_none() && !term.iri.is_empty() {
        value.concept_uri = term.iri;
        report.concepts_added += 1;
    }
    if !value.is_harmonized() && !term.label.trim().is_empty() {
        value.harmonized_label = term.label;
        report.labels_added += 1;
    }
    if value.description.trim().is_empty() && !term.description.is_empty() {
        value.description = term.description;
        report.descriptions_added += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::MockLookup;
    use crate::mapping::{Annotation, FieldDescriptor};

    fn document() -> MappingDocument {
        let mut doc = MappingDocument::new();
        doc.insert(
            "sex",
            FieldDescriptor::Enum {
                required: true,
                values: vec![
                    EnumValue::new("female"),
                    EnumValue::new("male").with_label("Male (curated)"),
                    EnumValue::new("unknown"),
                ],
                annotation: Annotation::default().with_registry("2200604", "3.0"),
            },
        )
        .unwrap();
        doc.insert(
            "site",
            FieldDescriptor::Enum {
                required: true,
                values: vec![EnumValue::new("Female")],
                annotation: Annotation::described("Collection site"),
            },
        )
        .unwrap();
        doc
    }

    fn lookup() -> MockLookup {
        MockLookup::new()
            .with_label(
                "female",
                Term::new("http://purl.obolibrary.org/obo/PATO_0000383", "Female")
                    .with_description("female quality"),
            )
            .with_label("male", Term::new("http://purl.obolibrary.org/obo/PATO_0000384", "Male"))
            .with_identifier("2200604", Term::new("", "Person Gender").with_description("Sex of the subject"))
    }

    #[test]
    fn test_fills_only_blank_fields() {
        let mut doc = document();
        let report = Enricher::new(lookup()).enrich(&mut doc).unwrap();

        let sex = doc.get("sex").unwrap();
        assert_eq!(sex.annotation().unwrap().description, "Sex of the subject");

        let values = sex.enum_values().unwrap();
        assert_eq!(values[0].harmonized_label, "Female");
        assert_eq!(values[0].concept_uri, "http://purl.obolibrary.org/obo/PATO_0000383");
        assert_eq!(values[0].description, "female quality");
        // Curated label is kept
        assert_eq!(values[1].harmonized_label, "Male (curated)");
        assert_eq!(values[1].concept_uri, "http://purl.obolibrary.org/obo/PATO_0000384");
        assert!(values[2].concept().is_none());

        // Described fields are not looked up again
        let site = doc.get("site").unwrap();
        assert_eq!(site.annotation().unwrap().description, "Collection site");

        assert_eq!(report.fields_described, 1);
        assert_eq!(report.concepts_added, 3);
        assert_eq!(report.labels_added, 2);
        assert_eq!(report.unmatched, vec!["unknown".to_string()]);
        assert!(report.changed());
    }

    #[test]
    fn test_repeated_queries_are_cached() {
        let mut doc = document();
        let lookup = Arc::new(lookup());
        let report = Enricher::shared(lookup.clone()).enrich(&mut doc).unwrap();

        // "female" and "Female" differ as queries; the mock folds case
        assert_eq!(report.lookups, lookup.requests());
        assert_eq!(report.lookups, 5);
    }

    #[test]
    fn test_second_pass_changes_nothing_curated() {
        let mut doc = document();
        let enricher = Enricher::new(lookup());
        enricher.enrich(&mut doc).unwrap();
        let snapshot = doc.clone();

        let report = enricher.enrich(&mut doc).unwrap();
        assert_eq!(doc, snapshot);
        assert!(!report.changed());
    }
}
