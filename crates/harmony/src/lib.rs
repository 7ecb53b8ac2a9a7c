//! Harmony: schema inference and harmonized export for tabular research data.
//!
//! Harmony reads a delimited table, infers a mapping document describing
//! every column, and, once a curator (or the enrichment step) has filled in
//! registry identifiers and harmonized labels, re-emits the data in a
//! strictly typed form.
//!
//! # Core Principles
//!
//! - **Curated, not guessed**: enum values are only harmonized through labels
//!   a curator or terminology service supplied
//! - **Non-destructive**: the input file is never modified
//! - **All or nothing**: every export is written atomically
//!
//! # Example
//!
//! ```no_run
//! use harmony::{Harmony, OutputFormat};
//!
//! let harmony = Harmony::new();
//! let result = harmony.infer("cohort.csv").unwrap();
//! result.document.save("cohort.mapping.json").unwrap();
//!
//! // ...curate cohort.mapping.json...
//!
//! let document = harmony::MappingDocument::load("cohort.mapping.json").unwrap();
//! harmony
//!     .export("cohort.csv", &document, "cohort.avro", OutputFormat::Pfb)
//!     .unwrap();
//! ```

pub mod enrich;
pub mod error;
pub mod export;
pub mod inference;
pub mod input;
pub mod mapping;

mod atomic;
mod harmony;

pub use crate::harmony::{ExportReport, Harmony, HarmonyConfig, InferenceResult, OutputFormat};
pub use error::{HarmonyError, Result};
pub use export::{ExportSchema, ExportSchemaBuilder, HarmonizationMapper};
pub use inference::{ClassifierConfig, FieldClassifier};
pub use input::{DataTable, SourceMetadata};
pub use mapping::{Annotation, EnumValue, FieldDescriptor, MappingDocument};
