//! Export command - write harmonized data through a curated document.

use std::path::PathBuf;

use colored::Colorize;
use harmony::export::LinkedDataConfig;
use harmony::input::parse_delimiter;
use harmony::mapping::mapping_path;
use harmony::{Harmony, HarmonyConfig, MappingDocument, OutputFormat};

/// Arguments of the export command.
pub struct ExportArgs {
    pub file: PathBuf,
    pub mapping: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub delimiter: Option<String>,
    pub base_uri: Option<String>,
    pub node_name: Option<String>,
}

pub fn run(args: ExportArgs, _verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }

    let mapping = args.mapping.unwrap_or_else(|| mapping_path(&args.file));
    if !mapping.exists() {
        return Err(format!(
            "Mapping document not found: {}\nRun 'harmony infer {}' first.",
            mapping.display(),
            args.file.display()
        )
        .into());
    }
    let document = MappingDocument::load(&mapping)?;

    let progress = document.progress();
    if !progress.is_export_ready() {
        println!(
            "{} {} of {} enum value(s) have no harmonized label",
            "Warning:".yellow().bold(),
            progress.enum_values - progress.harmonized_values,
            progress.enum_values
        );
    }

    let mut config = HarmonyConfig::default();
    if let Some(d) = args.delimiter {
        config.parser.delimiter = Some(parse_delimiter(&d)?);
    }
    if let Some(uri) = args.base_uri {
        config.linked_data = LinkedDataConfig::with_base_uri(uri);
    }
    if let Some(name) = args.node_name {
        config.export = config.export.with_node_name(name);
    }

    let output = args.output.unwrap_or_else(|| {
        let stem = args.file.file_stem().unwrap_or_default().to_string_lossy();
        args.file
            .with_file_name(format!("{}.harmonized.{}", stem, args.format.extension()))
    });

    println!(
        "{} {} as {}",
        "Exporting".cyan().bold(),
        args.file.display().to_string().white(),
        args.format.to_string().white().bold()
    );

    let report = Harmony::with_config(config).export(&args.file, &document, &output, args.format)?;

    println!(
        "{} {} row(s) to {}",
        "Wrote".green().bold(),
        report.rows,
        report.path.display().to_string().cyan()
    );

    Ok(())
}
