//! Mapping documents: the curated, on-disk description of a table.
//!
//! A [`MappingDocument`] is produced by the classifier, edited by a curator
//! (and optionally filled by the enrichment step), and read by every export.

mod descriptor;
mod document;
mod persistence;

pub use descriptor::{Annotation, EnumValue, FieldDescriptor};
pub use document::{CurationProgress, MappingDocument};
pub use persistence::mapping_path;
