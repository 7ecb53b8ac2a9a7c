//! Status command - show curation progress of a mapping document.

use std::path::PathBuf;

use colored::Colorize;
use harmony::MappingDocument;
use harmony::mapping::mapping_path;

pub fn run(
    doc: PathBuf,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Accept the data file as well as the document itself
    let doc_path = if doc.extension().map(|e| e == "json").unwrap_or(false) {
        doc.clone()
    } else {
        mapping_path(&doc)
    };

    if !doc_path.exists() {
        return Err(format!(
            "Mapping document not found: {}\nRun 'harmony infer {}' first.",
            doc_path.display(),
            doc.display()
        )
        .into());
    }

    let document = MappingDocument::load(&doc_path)?;
    let progress = document.progress();

    if json_output {
        let status = serde_json::json!({
            "document": doc_path,
            "title": document.title,
            "progress": progress,
            "export_ready": progress.is_export_ready(),
            "unharmonized": unharmonized(&document),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Curation status for".cyan().bold(),
        doc_path.display().to_string().white()
    );
    if let Some(title) = &document.title {
        println!("Title: {}", title.white());
    }
    println!();

    println!(
        "Labels:   {} {}/{} ({:.0}%)",
        bar(progress.harmonized_values, progress.enum_values).cyan(),
        progress.harmonized_values.to_string().white().bold(),
        progress.enum_values,
        percent(progress.harmonized_values, progress.enum_values)
    );
    println!();

    println!("{}", "Fields:".yellow().bold());
    println!("  Total:       {}", progress.fields.to_string().white());
    println!("  Described:   {}", progress.described_fields.to_string().green());
    println!("  Registered:  {}", progress.registered_fields.to_string().green());
    println!("  Enumerated:  {}", progress.enum_fields.to_string().blue());
    println!();

    println!("{}", "Enum values:".yellow().bold());
    println!("  Total:          {}", progress.enum_values.to_string().white());
    println!(
        "  Harmonized:     {}",
        progress.harmonized_values.to_string().green()
    );
    println!(
        "  With concepts:  {}",
        progress.values_with_concepts.to_string().green()
    );
    println!();

    let pending = unharmonized(&document);
    if verbose && !pending.is_empty() {
        println!("{}", "Awaiting labels:".yellow().bold());
        for (column, value) in &pending {
            println!("  {}: {}", column, value.red());
        }
        println!();
    }

    if progress.is_export_ready() {
        println!("{}", "Every enum value is harmonized; ready to export.".green().bold());
    } else {
        println!(
            "{} value(s) still need a harmonized label before export.",
            pending.len().to_string().red().bold()
        );
    }

    Ok(())
}

/// `(column, value)` pairs of enum values without a harmonized label.
fn unharmonized(document: &MappingDocument) -> Vec<(String, String)> {
    document
        .iter()
        .filter_map(|(name, field)| field.enum_values().map(|values| (name, values)))
        .flat_map(|(name, values)| {
            values
                .iter()
                .filter(|v| !v.is_harmonized())
                .map(move |v| (name.to_string(), v.value.clone()))
        })
        .collect()
}

fn percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        done as f64 * 100.0 / total as f64
    }
}

fn bar(done: usize, total: usize) -> String {
    let width = 30;
    let filled = ((percent(done, total) / 100.0) * width as f64).round() as usize;
    "█".repeat(filled) + &"░".repeat(width - filled)
}
