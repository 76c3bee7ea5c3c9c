//! Parse command - extract flights from already recognized OCR text.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::info;

use flocr_core::{FlightParser, ItineraryParser, LayoutKind};

use super::load_config;
use super::output::{format_records, write_output, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text files holding OCR output ("-" reads stdin)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Force a layout instead of detecting it per text
    #[arg(short, long)]
    layout: Option<LayoutKind>,

    /// Print the detected layout and extraction warnings
    #[arg(long)]
    show_warnings: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let mut parser = FlightParser::from_config(&config.extraction)?;
    if args.layout.is_some() {
        parser = parser.with_layout(args.layout);
    }

    let mut records = Vec::new();
    for input in &args.inputs {
        let text = read_text(input)?;
        let result = parser.parse(&text);
        info!(
            "{}: {} flights ({} layout)",
            input.display(),
            result.records.len(),
            result.layout
        );

        if args.show_warnings {
            eprintln!(
                "{} {}: {} layout, {} flights",
                style("ℹ").blue(),
                input.display(),
                result.layout,
                result.records.len()
            );
            for warning in &result.warnings {
                eprintln!("  {} {}", style("!").yellow(), warning);
            }
        }

        records.extend(result.records);
    }

    let format = args.format.unwrap_or_else(|| config.export.format.into());
    let content = format_records(&records, format, config.export.delimiter)?;
    write_output(&content, args.output.as_deref())?;

    Ok(())
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    Ok(fs::read_to_string(path)?)
}
