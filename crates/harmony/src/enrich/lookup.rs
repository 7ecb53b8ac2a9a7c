//! Terminology lookup trait and types.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A concept returned by a terminology service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Concept IRI.
    pub iri: String,
    /// Preferred label.
    pub label: String,
    /// Definition, blank when the service has none.
    #[serde(default)]
    pub description: String,
}

impl Term {
    /// Create a term without a definition.
    pub fn new(iri: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            label: label.into(),
            description: String::new(),
        }
    }

    /// Add a definition.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Trait for terminology services.
///
/// Implementations must be thread-safe (Send + Sync) so an enricher can be
/// shared. A term that does not exist is `Ok(None)`; `Err` is reserved for
/// failed requests.
pub trait TermLookup: Send + Sync {
    /// Find the concept whose label matches `label`.
    fn lookup_label(&self, label: &str) -> Result<Option<Term>>;

    /// Find the concept with a registry or ontology identifier, such as
    /// `PATO:0000383` or a full IRI.
    fn lookup_identifier(&self, id: &str) -> Result<Option<Term>>;

    /// Name of the service (for logging).
    fn name(&self) -> &str;
}
