//! Harmonized outputs built from a curated mapping document.
//!
//! [`ExportSchemaBuilder`] compiles the document into a typed row schema and
//! [`HarmonizationMapper`] resolves each cell. Both feed the container
//! writer; the delimited and JSON-LD writers reuse the mapper.

mod avro;
mod container;
mod delimited;
mod harmonize;
mod linked_data;
pub mod naming;
mod schema;

pub use avro::install_name_validators;
pub use container::{
    ContainerSummary, ContainerWriter, DEFAULT_BLOCK_RECORDS, ExportConfig, RegistryConfig,
};
pub use delimited::DelimitedWriter;
pub use harmonize::{Datum, HarmonizationMapper};
pub use linked_data::{LinkedDataConfig, LinkedDataWriter};
pub use schema::{
    DEFAULT_NODE_NAME, ExportField, ExportSchema, ExportSchemaBuilder, FieldKind,
    RESERVED_TYPE_NAMES, symbol_for,
};
