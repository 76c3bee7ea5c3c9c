//! Flight record assembly: runs the field extractors over every span the
//! layout produces and builds the ordered record list.

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::error::{FlocrError, Result};
use crate::models::config::{CarrierProfile, ExtractionConfig};
use crate::models::flight::FlightRecord;

use super::layout::{classify_layout, LayoutKind};
use super::normalizer::TextNormalizer;
use super::rules::{
    extract_operated_by, extract_terminal_places,
    patterns::{carrier_marker_pattern, CELL_DELIMITER, DEFAULT_CARRIER_MARKER, FLIGHT_DESIGNATOR, ROUTE_HEADER},
    DurationExtractor, FieldExtractor, FlightNumberExtractor, LayoverExtractor, Route, RouteExtractor,
    TimeExtractor,
};
use super::segmenter::{segment_blocks, segment_detail, TextSpan};
use super::ItineraryParser;

/// Minimum number of delimited cells for a tabular line to be read
/// positionally, one cell per output column.
const POSITIONAL_CELLS: usize = 8;

/// Result of parsing one OCR text.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Records in source order.
    pub records: Vec<FlightRecord>,
    /// Layout used to parse the text.
    pub layout: LayoutKind,
    /// Text after normalization.
    pub normalized_text: String,
    /// Spans or lines dropped for lack of a flight-number anchor.
    pub dropped_spans: usize,
    /// Notes about partial records.
    pub warnings: Vec<String>,
}

/// Records collected during one parse.
#[derive(Debug, Default)]
struct Assembly {
    records: Vec<FlightRecord>,
    dropped: usize,
}

impl Assembly {
    fn push(&mut self, record: FlightRecord) {
        trace!("Assembled record {:?}", record.flight_number);
        self.records.push(record);
    }

    fn drop_span(&mut self) {
        self.dropped += 1;
    }

    /// A layover seen after a flight belongs to the last record emitted.
    fn bind_layover(&mut self, layover: String) {
        match self.records.last_mut() {
            Some(record) => {
                debug!("Binding layover {} to {:?}", layover, record.flight_number);
                record.layover_time = Some(layover);
            }
            None => trace!("Layover {} precedes every flight, ignoring", layover),
        }
    }
}

/// Heuristic flight parser combining layout classification, segmentation
/// and field extraction.
#[derive(Debug, Clone)]
pub struct FlightParser {
    normalizer: TextNormalizer,
    flight_numbers: FlightNumberExtractor,
    routes: RouteExtractor,
    carriers: Vec<CarrierProfile>,
    /// Matches a carrier name on a tabular line.
    carrier_marker: Regex,
    default_carrier: String,
    /// Forced layout; classified per text when unset.
    layout: Option<LayoutKind>,
}

impl FlightParser {
    /// Create a parser for the default carrier (IndiGo, code 6E).
    pub fn new() -> Self {
        let defaults = ExtractionConfig::default();

        Self {
            normalizer: TextNormalizer::new(),
            flight_numbers: FlightNumberExtractor::new(),
            routes: RouteExtractor::new()
                .with_ignored_words(&defaults.ignored_words)
                .with_ignored_words([defaults.default_carrier.as_str()]),
            carriers: defaults.carriers,
            carrier_marker: DEFAULT_CARRIER_MARKER.clone(),
            default_carrier: defaults.default_carrier,
            layout: None,
        }
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let default_carrier = config.default_carrier.trim();
        if default_carrier.is_empty() {
            return Err(FlocrError::Config("default_carrier must not be empty".to_string()));
        }

        let carriers: Vec<CarrierProfile> = config
            .carriers
            .iter()
            .filter(|c| !c.code.trim().is_empty())
            .cloned()
            .collect();

        let codes: Vec<&str> = carriers.iter().map(|c| c.code.trim()).collect();
        let flight_numbers = FlightNumberExtractor::for_codes(&codes)?;

        let mut names: Vec<&str> = carriers
            .iter()
            .map(|c| c.name.trim())
            .filter(|n| !n.is_empty())
            .collect();
        names.push(default_carrier);
        let carrier_marker = carrier_marker_pattern(&names)?;

        Ok(Self {
            normalizer: TextNormalizer::new().with_substitutions(config.ocr_substitutions.clone()),
            flight_numbers,
            routes: RouteExtractor::new()
                .with_ignored_words(&config.ignored_words)
                .with_ignored_words(&names),
            carriers,
            carrier_marker,
            default_carrier: default_carrier.to_string(),
            layout: config.layout,
        })
    }

    /// Set the carrier used when nothing names another one.
    pub fn with_default_carrier(mut self, carrier: impl Into<String>) -> Self {
        self.default_carrier = carrier.into();
        self
    }

    /// Force a layout instead of classifying each text.
    pub fn with_layout(mut self, layout: Option<LayoutKind>) -> Self {
        self.layout = layout;
        self
    }

    /// The normalizer applied before parsing.
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Layout used for already-normalized text.
    pub fn classify(&self, normalized: &str) -> LayoutKind {
        self.layout.unwrap_or_else(|| classify_layout(normalized))
    }

    /// Carrier whose code starts the flight number, else the default.
    fn carrier_for(&self, flight_number: &str) -> String {
        let compact: String = flight_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        self.carriers
            .iter()
            .find(|profile| compact.starts_with(&profile.code.trim().to_uppercase()))
            .map(|profile| profile.name.clone())
            .unwrap_or_else(|| self.default_carrier.clone())
    }

    fn extract_fields(
        &self,
        span: &str,
        flight_number: Option<String>,
        carrier: String,
        route: Route,
    ) -> FlightRecord {
        let (departure, arrival) = TimeExtractor::new().extract_pair(span);

        FlightRecord {
            carrier,
            flight_number,
            from: route.from,
            to: route.to,
            departure,
            arrival,
            duration: DurationExtractor::new().extract(span).map(|m| m.value),
            layover_time: LayoverExtractor::new().extract(span).map(|m| m.value),
        }
        .normalized()
    }

    /// Build a record from a span; spans without a flight number yield none.
    fn assemble_span(&self, span: &TextSpan<'_>) -> Option<FlightRecord> {
        let text = span.as_str();
        let flight = self.flight_numbers.extract(text)?;
        let carrier = self.carrier_for(&flight.value);

        Some(self.extract_fields(text, Some(flight.value), carrier, self.routes.extract(text)))
    }

    fn parse_blocks(&self, text: &str, assembly: &mut Assembly) {
        let spans = segment_blocks(text, self.flight_numbers.anchor());
        debug!("Segmented text into {} flight blocks", spans.len());

        for span in &spans {
            match self.assemble_span(span) {
                Some(record) => assembly.push(record),
                None => assembly.drop_span(),
            }
        }
    }

    fn parse_detail(&self, text: &str, assembly: &mut Assembly) {
        let spans = segment_detail(text);
        debug!("Segmented text into {} detail sections", spans.len());

        for span in &spans {
            let section = span.as_str();
            let Some(header) = ROUTE_HEADER.captures(section) else {
                assembly.drop_span();
                continue;
            };

            let designator = header.get(3).map_or("", |m| m.as_str());
            let Some(flight) = FLIGHT_DESIGNATOR.find(designator) else {
                trace!("Route header without flight number: {:?}", designator);
                assembly.drop_span();
                continue;
            };

            let flight_number = flight.as_str().trim().to_string();
            let carrier = extract_operated_by(section)
                .unwrap_or_else(|| self.carrier_for(&flight_number));
            let route = extract_terminal_places(section)
                .unwrap_or_else(|| Route::new(&header[1], &header[2]));

            assembly.push(self.extract_fields(section, Some(flight_number), carrier, route));
        }
    }

    fn parse_tabular(&self, text: &str, assembly: &mut Assembly) {
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let has_marker =
                self.flight_numbers.is_match(line) || self.carrier_marker.is_match(line);

            if !has_marker {
                match LayoverExtractor::new().extract(line) {
                    Some(layover) => assembly.bind_layover(layover.value),
                    None => assembly.drop_span(),
                }
                continue;
            }

            let cells = split_cells(line);
            if cells.len() >= POSITIONAL_CELLS {
                assembly.push(self.assemble_cells(&cells));
                continue;
            }

            let spans = segment_blocks(line, self.flight_numbers.anchor());
            if spans.len() > 1 {
                trace!("Line holds {} flights, splitting", spans.len());
                for span in &spans {
                    match self.assemble_span(span) {
                        Some(record) => assembly.push(record),
                        None => assembly.drop_span(),
                    }
                }
                continue;
            }

            let flight_number = self.flight_numbers.extract(line).map(|m| m.value);
            let carrier = match flight_number.as_deref() {
                Some(number) => self.carrier_for(number),
                None => self.default_carrier.clone(),
            };
            let record = self.extract_fields(line, flight_number, carrier, self.routes.extract(line));

            // A carrier name alone is a logo or brand line, not a flight
            if record.flight_number.is_none() && !record.has_schedule() {
                trace!("Carrier line without flight data: {}", line);
                match record.layover_time {
                    Some(layover) => assembly.bind_layover(layover),
                    None => assembly.drop_span(),
                }
                continue;
            }
            assembly.push(record);
        }
    }

    /// Map delimited cells onto the output columns in order.
    fn assemble_cells(&self, cells: &[&str]) -> FlightRecord {
        let cell = |i: usize| {
            cells
                .get(i)
                .filter(|c| !is_placeholder(c))
                .map(|c| c.to_string())
        };

        FlightRecord {
            carrier: cell(0).unwrap_or_else(|| self.default_carrier.clone()),
            flight_number: cell(1),
            from: cell(2),
            to: cell(3),
            departure: cell(4),
            arrival: cell(5),
            duration: cell(6),
            layover_time: cell(7),
        }
        .normalized()
    }
}

impl Default for FlightParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ItineraryParser for FlightParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        info!("Parsing flights from {} characters of text", text.len());

        let normalized = self.normalizer.normalize(text);
        let layout = self.classify(&normalized);
        debug!("Using {} layout", layout);

        let mut assembly = Assembly::default();
        match layout {
            LayoutKind::Block => self.parse_blocks(&normalized, &mut assembly),
            LayoutKind::Detail => self.parse_detail(&normalized, &mut assembly),
            LayoutKind::Tabular => self.parse_tabular(&normalized, &mut assembly),
        }

        let warnings = collect_warnings(&assembly.records, &normalized);

        debug!(
            "Extracted {} flights ({} spans dropped)",
            assembly.records.len(),
            assembly.dropped
        );

        ExtractionResult {
            records: assembly.records,
            layout,
            normalized_text: normalized,
            dropped_spans: assembly.dropped,
            warnings,
        }
    }
}

/// Split a line on pipes, tabs or runs of spaces.
fn split_cells(line: &str) -> Vec<&str> {
    CELL_DELIMITER
        .split(line)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

fn is_placeholder(cell: &str) -> bool {
    cell.chars().all(|c| matches!(c, '-' | '–' | '—'))
}

fn collect_warnings(records: &[FlightRecord], normalized: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    if records.is_empty() && !normalized.is_empty() {
        warnings.push("No flight numbers found in text".to_string());
    }

    for record in records {
        let missing = record.missing_fields();
        if !missing.is_empty() {
            warnings.push(format!(
                "Flight {} is missing: {}",
                record.flight_number.as_deref().unwrap_or("(unnumbered)"),
                missing.join(", ")
            ));
        }
    }

    warnings
}
