//! Harmony CLI - schema inference and harmonized export.

mod cli;
mod commands;

use std::env;

use clap::Parser;
use cli::{Cli, Commands};
use log::LevelFilter;

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if env::var("RUST_LOG").is_err() {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        };
        builder.filter_module("harmony", level);
    }
    let _ = builder.format_timestamp(None).try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Infer {
            file,
            output,
            delimiter,
            enum_proportion,
            title,
        } => commands::infer::run(
            file,
            output,
            delimiter,
            enum_proportion,
            title,
            cli.verbose,
        ),

        Commands::Enrich {
            doc,
            output,
            ontology,
            base_url,
        } => commands::enrich::run(doc, output, ontology, base_url, cli.verbose),

        Commands::Export {
            file,
            mapping,
            output,
            format,
            delimiter,
            base_uri,
            node_name,
        } => commands::export::run(
            commands::export::ExportArgs {
                file,
                mapping,
                output,
                format,
                delimiter,
                base_uri,
                node_name,
            },
            cli.verbose,
        ),

        Commands::Status { doc, json } => commands::status::run(doc, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
