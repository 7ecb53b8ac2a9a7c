//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use harmony::OutputFormat;
use std::path::PathBuf;

/// Harmony: schema inference and harmonized export for tabular data
#[derive(Parser)]
#[command(name = "harmony")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Infer a mapping document from a data file
    Infer {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the mapping document (default: <file>.mapping.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field delimiter: a single character, or tab/comma/pipe/semicolon (default: auto-detect)
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Treat a column as enumerated when unique values < non-blank values * P
        #[arg(long, value_name = "P")]
        enum_proportion: Option<f64>,

        /// Dataset title stored in the document
        #[arg(long)]
        title: Option<String>,
    },

    /// Fill blank descriptions, labels and concept IRIs from an ontology service
    Enrich {
        /// Path to the mapping document
        #[arg(value_name = "DOC")]
        doc: PathBuf,

        /// Where to write the enriched document (default: overwrite DOC)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Restrict lookups to one ontology (e.g. "ncit")
        #[arg(long)]
        ontology: Option<String>,

        /// Ontology Lookup Service root URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Export a data file harmonized through a curated mapping document
    Export {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Curated mapping document (default: <file>.mapping.json)
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Output path (default: <file>.harmonized.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: pfb, csv, tsv or jsonld
        #[arg(short, long, default_value = "pfb")]
        format: OutputFormat,

        /// Field delimiter of the data file (default: auto-detect)
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Base IRI for JSON-LD row nodes
        #[arg(long)]
        base_uri: Option<String>,

        /// Name of the row record in container output
        #[arg(long)]
        node_name: Option<String>,
    },

    /// Show curation progress of a mapping document
    Status {
        /// Path to the mapping document, or the data file it describes
        #[arg(value_name = "DOC")]
        doc: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
