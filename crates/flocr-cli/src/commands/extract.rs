//! Extract command - OCR flight screenshots into a spreadsheet.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use flocr_core::models::config::OcrEngineKind;
use flocr_core::{
    collect_records, create_provider, ImageInput, ImageQueue, ImageReport, ImageStatus,
    LayoutKind, ScreenshotPipeline,
};

use super::load_config;
use super::output::{format_records, write_output, write_summary, OutputFormat};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "tif", "tiff", "gif"];

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Screenshot files or glob patterns, processed in the order given
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file ("-" for stdout; default from config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// OCR engine
    #[arg(short, long, value_enum)]
    engine: Option<EngineArg>,

    /// Model directory for the onnx engine
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Force a layout instead of detecting it per screenshot
    #[arg(short, long)]
    layout: Option<LayoutKind>,

    /// Skip grayscale/upscale/denoise/threshold preprocessing
    #[arg(long)]
    no_preprocess: bool,

    /// Also write a per-image summary CSV next to the output
    #[arg(long)]
    summary: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum EngineArg {
    /// tesseract command-line tool
    Tesseract,
    /// pure-onnx-ocr with PaddleOCR models
    Onnx,
}

impl From<EngineArg> for OcrEngineKind {
    fn from(engine: EngineArg) -> Self {
        match engine {
            EngineArg::Tesseract => OcrEngineKind::Tesseract,
            EngineArg::Onnx => OcrEngineKind::Onnx,
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(engine) = args.engine {
        config.ocr.engine = engine.into();
    }
    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }
    if args.layout.is_some() {
        config.extraction.layout = args.layout;
    }
    if args.no_preprocess {
        config.preprocessing.enabled = false;
    }

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No screenshots found for: {}", args.inputs.join(", "));
    }

    eprintln!(
        "{} Found {} screenshots to process",
        style("ℹ").blue(),
        files.len()
    );

    let provider = create_provider(&config.ocr)
        .map_err(|e| anyhow::anyhow!("Failed to start OCR engine: {}", e))?;
    let pipeline = ScreenshotPipeline::from_config(provider, &config)?;

    let mut reports: Vec<ImageReport> = Vec::with_capacity(files.len());
    let mut queue = ImageQueue::new();
    for path in &files {
        match ImageInput::from_path(path) {
            Ok(input) => queue.push(input),
            Err(e) => reports.push(ImageReport::failed(
                path.display().to_string(),
                ImageStatus::Unreadable(e.to_string()),
            )),
        }
    }

    let pb = ProgressBar::new(queue.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} screenshots")?
            .progress_chars("=>-"),
    );

    for input in queue.drain() {
        pb.set_message(input.label.clone());
        let report = pipeline.process(&input);
        debug!("{}: {}", report.label, report.status.as_str());
        for warning in &report.warnings {
            warn!("{}: {}", report.label, warning);
        }
        reports.push(report);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let records = collect_records(&reports);
    let format = args.format.unwrap_or_else(|| config.export.format.into());
    let content = format_records(&records, format, config.export.delimiter)?;

    let output_path = args.output.clone().unwrap_or_else(|| config.export.output.clone());
    write_output(&content, Some(&output_path))?;

    if args.summary {
        let summary_path = summary_path(&output_path);
        write_summary(&summary_path, &reports)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<&ImageReport> = reports.iter().filter(|r| r.status.is_failure()).collect();
    let empty = reports
        .iter()
        .filter(|r| r.status == ImageStatus::NoFlights)
        .count();

    eprintln!();
    eprintln!(
        "{} Extracted {} flights from {} screenshots in {:?}",
        style("✓").green(),
        records.len(),
        reports.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} without flights, {} failed",
        style(empty).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed screenshots:").red());
        for report in &failed {
            eprintln!(
                "  - {}: {}",
                report.label,
                report.status.message().unwrap_or("unknown error")
            );
        }
    }

    if failed.len() == reports.len() {
        anyhow::bail!("None of the screenshots could be processed");
    }

    Ok(())
}

/// Expand glob patterns, keeping argument order and dropping non-images.
fn expand_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        for path in glob(pattern)?.filter_map(|r| r.ok()) {
            if is_image(&path) && !files.contains(&path) {
                files.push(path);
            } else {
                debug!("Skipping {}", path.display());
            }
        }
    }

    Ok(files)
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    path.is_file() && IMAGE_EXTENSIONS.contains(&ext.as_str())
}

fn summary_path(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) if output != Path::new("-") => parent.join("summary.csv"),
        _ => PathBuf::from("summary.csv"),
    }
}
