//! Spreadsheet export: flight records as CSV, JSON or a text table, plus the
//! per-image summary written by `extract --summary`.

use std::fs;
use std::path::Path;

use chrono::Utc;
use console::style;
use serde_json::{json, Map, Value};

use flocr_core::models::config::ExportFormat;
use flocr_core::{FlightRecord, ImageReport, COLUMNS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV with a header row
    Csv,
    /// JSON document
    Json,
    /// Aligned plain-text table
    Text,
}

impl From<ExportFormat> for OutputFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Csv => OutputFormat::Csv,
            ExportFormat::Json => OutputFormat::Json,
            ExportFormat::Text => OutputFormat::Text,
        }
    }
}

/// Render records in the given format.
pub fn format_records(
    records: &[FlightRecord],
    format: OutputFormat,
    delimiter: char,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Csv => format_csv(records, delimiter),
        OutputFormat::Json => format_json(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_csv(records: &[FlightRecord], delimiter: char) -> anyhow::Result<String> {
    if !delimiter.is_ascii() {
        anyhow::bail!("CSV delimiter must be an ASCII character, got {:?}", delimiter);
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter as u8)
        .from_writer(vec![]);

    wtr.write_record(COLUMNS)?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_json(records: &[FlightRecord]) -> anyhow::Result<String> {
    let flights: Vec<Value> = records
        .iter()
        .map(|record| {
            let row: Map<String, Value> = COLUMNS
                .iter()
                .zip(record.to_row())
                .map(|(column, value)| (column.to_string(), Value::String(value.to_string())))
                .collect();
            Value::Object(row)
        })
        .collect();

    let document = json!({
        "generated_at": Utc::now().to_rfc3339(),
        "flights": flights,
    });

    Ok(serde_json::to_string_pretty(&document)?)
}

fn format_text(records: &[FlightRecord]) -> String {
    let rows: Vec<[&str; 8]> = records.iter().map(|r| r.to_row()).collect();

    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[&str; 8]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut output = String::new();
    output.push_str(&render(&COLUMNS));
    output.push('\n');
    output.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    output.push('\n');
    for row in &rows {
        output.push_str(&render(row));
        output.push('\n');
    }

    output
}

/// Write rendered output to a file, or to stdout when no path (or "-") is given.
pub fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) if path != Path::new("-") => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
            eprintln!(
                "{} Output written to {}",
                style("✓").green(),
                path.display()
            );
        }
        _ => print!("{}", content),
    }

    Ok(())
}

/// Write one status row per processed image.
pub fn write_summary(path: &Path, reports: &[ImageReport]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "layout",
        "flights",
        "processing_time_ms",
        "message",
    ])?;

    for report in reports {
        wtr.write_record([
            report.label.as_str(),
            report.status.as_str(),
            report.layout.map(|l| l.as_str()).unwrap_or(""),
            &report.records.len().to_string(),
            &report.processing_time_ms.to_string(),
            report.status.message().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flocr_core::ImageStatus;

    fn sample() -> Vec<FlightRecord> {
        let mut first = FlightRecord::new("Indigo");
        first.flight_number = Some("6E 2341".to_string());
        first.from = Some("Raipur".to_string());
        first.to = Some("Kolkata".to_string());
        first.departure = Some("16:55".to_string());
        first.arrival = Some("18:20".to_string());
        first.duration = Some("01h 25m".to_string());
        first.layover_time = Some("1h 30m".to_string());

        let mut second = FlightRecord::new("Indigo");
        second.flight_number = Some("6E 5309".to_string());

        vec![first, second]
    }

    #[test]
    fn test_csv_output() {
        let csv = format_records(&sample(), OutputFormat::Csv, ',').unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Carrier,Flight No.,From,To,Departure,Arrival,Duration,Layover Time",
                "Indigo,6E 2341,Raipur,Kolkata,16:55,18:20,01h 25m,1h 30m",
                "Indigo,6E 5309,,,,,,",
            ]
        );
    }

    #[test]
    fn test_csv_empty_has_header() {
        let csv = format_records(&[], OutputFormat::Csv, ';').unwrap();
        assert_eq!(
            csv,
            "Carrier;Flight No.;From;To;Departure;Arrival;Duration;Layover Time\n"
        );
        assert!(format_records(&[], OutputFormat::Csv, '→').is_err());
    }

    #[test]
    fn test_json_output() {
        let json = format_records(&sample(), OutputFormat::Json, ',').unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert!(value["generated_at"].is_string());
        assert_eq!(value["flights"][0]["Flight No."], "6E 2341");
        assert_eq!(value["flights"][1]["From"], "");
        assert_eq!(value["flights"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_text_table() {
        let text = format_records(&sample(), OutputFormat::Text, ',').unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Carrier  Flight No.  From    To"));
        assert!(lines[1].starts_with("-------  ----------"));
        assert!(lines[2].contains("6E 2341"));
        assert_eq!(lines[3].trim_end(), "Indigo   6E 5309");
    }

    #[test]
    fn test_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let reports = vec![ImageReport::failed(
            "bad.png",
            ImageStatus::Unreadable("bad header".to_string()),
        )];

        write_summary(&path, &reports).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();

        assert!(content.starts_with("filename,status,layout,flights"));
        assert!(content.contains("bad.png,unreadable,,0,0,bad header"));
    }
}
