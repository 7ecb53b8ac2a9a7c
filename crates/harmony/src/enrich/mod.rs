//! Terminology enrichment for mapping documents.
//!
//! Enrichment is optional: export works on any document, and fails on enum
//! values that are still unharmonized when they occur in the data.
//!
//! # Supported Services
//!
//! - **OLS** - EBI Ontology Lookup Service search API
//! - **Mock** - fixed in-memory table, for tests and offline runs
//!
//! # Example
//!
//! ```no_run
//! use harmony::MappingDocument;
//! use harmony::enrich::{Enricher, OlsClient, OlsConfig};
//!
//! # fn main() -> harmony::Result<()> {
//! let mut document = MappingDocument::load("cohort.mapping.json")?;
//! let client = OlsClient::with_config(OlsConfig::default().with_ontology("ncit"))?;
//! let report = Enricher::new(client).enrich(&mut document)?;
//! println!("{} concept(s) added", report.concepts_added);
//! document.save("cohort.mapping.json")?;
//! # Ok(())
//! # }
//! ```

mod enricher;
mod lookup;
mod mock;
mod ols;

pub use enricher::{EnrichmentReport, Enricher};
pub use lookup::{Term, TermLookup};
pub use mock::MockLookup;
pub use ols::{DEFAULT_OLS_URL, OlsClient, OlsConfig};
