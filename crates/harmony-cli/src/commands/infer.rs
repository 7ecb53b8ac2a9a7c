//! Infer command - classify a data file into a mapping document.

use std::path::PathBuf;

use colored::Colorize;
use harmony::input::parse_delimiter;
use harmony::mapping::mapping_path;
use harmony::{ClassifierConfig, Harmony, HarmonyConfig};

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    delimiter: Option<String>,
    enum_proportion: Option<f64>,
    title: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let mut config = HarmonyConfig::default();
    if let Some(d) = delimiter {
        config.parser.delimiter = Some(parse_delimiter(&d)?);
    }
    if let Some(p) = enum_proportion {
        if !(0.0..=1.0).contains(&p) {
            return Err(format!("--enum-proportion must be between 0 and 1, got {}", p).into());
        }
        config.classifier = ClassifierConfig { enum_proportion: p };
    }

    println!(
        "{} {}",
        "Inferring".cyan().bold(),
        file.display().to_string().white()
    );

    let result = Harmony::with_config(config).infer(&file)?;
    let mut document = result.document;
    if let Some(t) = title {
        document = document.with_title(t);
    }

    println!(
        "  {} rows, {} columns ({} format)",
        result.source.row_count.to_string().white().bold(),
        result.source.column_count.to_string().white().bold(),
        result.source.format
    );

    if verbose {
        println!();
        println!("{}", "Fields:".yellow().bold());
        for (name, field) in document.iter() {
            let detail = match field.enum_values() {
                Some(values) => format!("{} value(s)", values.len()),
                None => String::new(),
            };
            let required = if field.is_required() { "required" } else { "" };
            println!(
                "  {:24} {:8} {:9} {}",
                name,
                field.type_name(),
                required,
                detail.dimmed()
            );
        }
    }

    let enum_fields = document.progress().enum_fields;
    let output_path = output.unwrap_or_else(|| mapping_path(&file));
    document.save(&output_path)?;

    println!();
    println!(
        "{} {} field(s), {} enumerated",
        "Classified".green().bold(),
        document.len(),
        enum_fields
    );
    println!(
        "Mapping document saved to: {}",
        output_path.display().to_string().cyan()
    );
    println!();
    println!(
        "Curate harmonized labels, then run {}",
        format!(
            "harmony export {} --mapping {}",
            file.display(),
            output_path.display()
        )
        .cyan()
        .bold()
    );

    Ok(())
}
