//! pdfbates - Bates-number, rename, and stamp a document production tree.

use clap::Parser;
use std::process;

use pdfbates::cli::Cli;
use pdfbates::convert::NoConversion;
use pdfbates::error::BatesError;
use pdfbates::output::OutputFormatter;
use pdfbates::pipeline::Pipeline;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Main application logic.
fn run(cli: Cli) -> Result<(), BatesError> {
    let json = cli.json;
    let config = cli
        .to_config()
        .map_err(|e| BatesError::invalid_config(e.to_string()))?;

    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() && !json {
        formatter.section(&format!("{} v{}", pdfbates::NAME, pdfbates::VERSION));
        formatter.blank_line();
    }

    let gateway = NoConversion;
    let result = Pipeline::new(&config, &gateway, &formatter).run()?;

    if json {
        let rendered = serde_json::to_string_pretty(&result)
            .map_err(|e| BatesError::other(e.to_string()))?;
        println!("{rendered}");
        return Ok(());
    }

    if formatter.should_print() {
        formatter.blank_line();
        formatter.section("Summary");
        formatter.detail("Items", &result.total_items.to_string());
        formatter.detail("Pages", &result.total_pages.to_string());
        formatter.detail("Renames", &result.rename_log.len().to_string());
        formatter.detail("Skipped", &result.skipped.len().to_string());
        formatter.detail("Errors", &result.errors.len().to_string());
    }

    for error in &result.errors {
        formatter.warning(error);
    }

    Ok(())
}
