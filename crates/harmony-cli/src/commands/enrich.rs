//! Enrich command - fill blank curation fields from an ontology service.

use std::path::PathBuf;

use colored::Colorize;
use harmony::MappingDocument;
use harmony::enrich::{Enricher, OlsClient, OlsConfig};

pub fn run(
    doc: PathBuf,
    output: Option<PathBuf>,
    ontology: Option<String>,
    base_url: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !doc.exists() {
        return Err(format!("Mapping document not found: {}", doc.display()).into());
    }

    let mut document = MappingDocument::load(&doc)?;

    let mut config = OlsConfig::default();
    if let Some(url) = base_url {
        config = config.with_base_url(url);
    }
    if let Some(o) = ontology {
        config = config.with_ontology(o);
    }

    println!(
        "{} {} via {}",
        "Enriching".cyan().bold(),
        doc.display().to_string().white(),
        config.base_url.dimmed()
    );

    let enricher = Enricher::new(OlsClient::with_config(config)?);
    let report = enricher.enrich(&mut document)?;

    println!("  Lookups:              {}", report.lookups.to_string().white());
    println!(
        "  Field descriptions:   {}",
        report.fields_described.to_string().green()
    );
    println!(
        "  Concept IRIs:         {}",
        report.concepts_added.to_string().green()
    );
    println!(
        "  Harmonized labels:    {}",
        report.labels_added.to_string().green()
    );
    println!(
        "  Value descriptions:   {}",
        report.descriptions_added.to_string().green()
    );
    println!(
        "  Unmatched:            {}",
        report.unmatched.len().to_string().yellow()
    );
    if verbose {
        for query in &report.unmatched {
            println!("    {}", query.dimmed());
        }
    }
    println!();

    if !report.changed() {
        println!("{}", "Nothing to fill; document left unchanged.".yellow());
        return Ok(());
    }

    let output_path = output.unwrap_or(doc);
    document.save(&output_path)?;
    println!(
        "Enriched document saved to: {}",
        output_path.display().to_string().cyan()
    );

    Ok(())
}
