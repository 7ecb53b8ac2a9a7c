//! In-memory terminology lookup for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Result;

use super::lookup::{Term, TermLookup};

/// Lookup that serves a fixed table of terms.
///
/// Labels match case-insensitively; identifiers match exactly.
#[derive(Debug, Default)]
pub struct MockLookup {
    labels: HashMap<String, Term>,
    identifiers: HashMap<String, Term>,
    requests: AtomicUsize,
}

impl MockLookup {
    /// Create an empty lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `term` for searches of `label`.
    pub fn with_label(mut self, label: &str, term: Term) -> Self {
        self.labels.insert(label.to_lowercase(), term);
        self
    }

    /// Serve `term` for the identifier `id`.
    pub fn with_identifier(mut self, id: impl Into<String>, term: Term) -> Self {
        self.identifiers.insert(id.into(), term);
        self
    }

    /// Number of lookups served so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

impl TermLookup for MockLookup {
    fn lookup_label(&self, label: &str) -> Result<Option<Term>> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        Ok(self.labels.get(&label.to_lowercase()).cloned())
    }

    fn lookup_identifier(&self, id: &str) -> Result<Option<Term>> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        Ok(self.identifiers.get(id).cloned())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
