//! Screenshot pipeline: decode, preprocess, recognize and parse queued
//! images one at a time.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::itinerary::{FlightParser, ItineraryParser, LayoutKind};
use crate::models::{FlightRecord, FlocrConfig};
use crate::ocr::{ImagePreprocessor, OcrProvider};

/// Raw bytes of one screenshot with a label for reports.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// File name or other caller-chosen label.
    pub label: String,
    /// Encoded image (PNG, JPEG, ...).
    pub bytes: Vec<u8>,
}

impl ImageInput {
    pub fn from_bytes(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            bytes,
        }
    }

    /// Read an image file; the label is the path as given.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(path.display().to_string(), bytes))
    }
}

/// Pending screenshots, processed in arrival order.
#[derive(Debug, Default)]
pub struct ImageQueue {
    inputs: VecDeque<ImageInput>,
}

impl ImageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, input: ImageInput) {
        debug!("Queued image {}", input.label);
        self.inputs.push_back(input);
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Remove every queued image, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = ImageInput> + '_ {
        self.inputs.drain(..)
    }
}

impl Extend<ImageInput> for ImageQueue {
    fn extend<I: IntoIterator<Item = ImageInput>>(&mut self, iter: I) {
        for input in iter {
            self.push(input);
        }
    }
}

impl FromIterator<ImageInput> for ImageQueue {
    fn from_iter<I: IntoIterator<Item = ImageInput>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

/// Outcome of processing one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum ImageStatus {
    /// At least one flight was extracted.
    Extracted,
    /// OCR succeeded but no flight number was found.
    NoFlights,
    /// The bytes could not be decoded or preprocessed.
    Unreadable(String),
    /// The OCR backend failed.
    OcrFailed(String),
}

impl ImageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extracted => "extracted",
            Self::NoFlights => "no_flights",
            Self::Unreadable(_) => "unreadable",
            Self::OcrFailed(_) => "ocr_failed",
        }
    }

    /// Failure detail, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Unreadable(msg) | Self::OcrFailed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.message().is_some()
    }
}

/// Per-image result.
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub label: String,
    pub status: ImageStatus,
    /// Layout the text was parsed with; unset when OCR did not run.
    pub layout: Option<LayoutKind>,
    pub records: Vec<FlightRecord>,
    pub warnings: Vec<String>,
    pub processing_time_ms: u64,
}

impl ImageReport {
    /// Report for an image that produced no text.
    pub fn failed(label: impl Into<String>, status: ImageStatus) -> Self {
        let label = label.into();
        warn!("{}: {}", label, status.message().unwrap_or(status.as_str()));
        Self {
            label,
            status,
            layout: None,
            records: Vec::new(),
            warnings: Vec::new(),
            processing_time_ms: 0,
        }
    }

    fn failed_since(label: &str, status: ImageStatus, start: Instant) -> Self {
        Self {
            processing_time_ms: start.elapsed().as_millis() as u64,
            ..Self::failed(label, status)
        }
    }
}

/// Runs screenshots through preprocessing, OCR and flight parsing.
pub struct ScreenshotPipeline<P: OcrProvider> {
    provider: P,
    preprocessor: ImagePreprocessor,
    parser: FlightParser,
}

impl<P: OcrProvider> ScreenshotPipeline<P> {
    /// Create a pipeline with default preprocessing and parsing.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            preprocessor: ImagePreprocessor::new(),
            parser: FlightParser::new(),
        }
    }

    /// Create a pipeline from configuration.
    pub fn from_config(provider: P, config: &FlocrConfig) -> Result<Self> {
        Ok(Self {
            provider,
            preprocessor: ImagePreprocessor::from_config(config.preprocessing.clone()),
            parser: FlightParser::from_config(&config.extraction)?,
        })
    }

    pub fn with_preprocessor(mut self, preprocessor: ImagePreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn with_parser(mut self, parser: FlightParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn parser(&self) -> &FlightParser {
        &self.parser
    }

    /// Process one image. Failures are reported in the status, never raised.
    pub fn process(&self, input: &ImageInput) -> ImageReport {
        let start = Instant::now();
        info!("Processing {} with {}", input.label, self.provider.name());

        let image = match image::load_from_memory(&input.bytes) {
            Ok(image) => image,
            Err(e) => {
                return ImageReport::failed_since(&input.label, ImageStatus::Unreadable(e.to_string()), start)
            }
        };

        let image = match self.preprocessor.process(&image) {
            Ok(image) => image,
            Err(e) => {
                return ImageReport::failed_since(&input.label, ImageStatus::Unreadable(e.to_string()), start)
            }
        };

        let text = match self.provider.recognize(&image) {
            Ok(text) => text,
            Err(e) => {
                return ImageReport::failed_since(&input.label, ImageStatus::OcrFailed(e.to_string()), start)
            }
        };

        let result = self.parser.parse(&text);
        let status = if result.records.is_empty() {
            ImageStatus::NoFlights
        } else {
            ImageStatus::Extracted
        };

        info!(
            "{}: {} flights ({} layout)",
            input.label,
            result.records.len(),
            result.layout
        );

        ImageReport {
            label: input.label.clone(),
            status,
            layout: Some(result.layout),
            records: result.records,
            warnings: result.warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Process every queued image in arrival order, emptying the queue.
    pub fn run(&self, queue: &mut ImageQueue) -> Vec<ImageReport> {
        let reports: Vec<ImageReport> = queue.drain().map(|input| self.process(&input)).collect();

        let failed = reports.iter().filter(|r| r.status.is_failure()).count();
        info!("Processed {} images ({} failed)", reports.len(), failed);

        reports
    }
}

/// All records of the given reports, image order first, then source order.
pub fn collect_records(reports: &[ImageReport]) -> Vec<FlightRecord> {
    reports
        .iter()
        .flat_map(|report| report.records.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use image::{DynamicImage, GrayImage, ImageFormat};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    /// Returns canned text for every image.
    struct StubProvider {
        text: String,
    }

    impl OcrProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn recognize(&self, _image: &DynamicImage) -> std::result::Result<String, OcrError> {
            Ok(self.text.clone())
        }
    }

    /// Echoes the image width as the flight number.
    struct WidthProvider;

    impl OcrProvider for WidthProvider {
        fn name(&self) -> &str {
            "width"
        }

        fn recognize(&self, image: &DynamicImage) -> std::result::Result<String, OcrError> {
            Ok(format!("6E {} 10:00 11:00 Raipur Kolkata 1h", image.width()))
        }
    }

    struct FailingProvider;

    impl OcrProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn recognize(&self, _image: &DynamicImage) -> std::result::Result<String, OcrError> {
            Err(OcrError::BackendNotAvailable("tesseract not found".to_string()))
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageLuma8(GrayImage::new(width, height));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_process_extracts_flights() {
        let pipeline = ScreenshotPipeline::new(StubProvider {
            text: "6E 2341 16:55 18:20 Raipur Kolkata 01h 25m".to_string(),
        });
        let report = pipeline.process(&ImageInput::from_bytes("one.png", png(8, 8)));

        assert_eq!(report.status, ImageStatus::Extracted);
        assert_eq!(report.layout, Some(LayoutKind::Tabular));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].flight_number.as_deref(), Some("6E 2341"));
    }

    #[test]
    fn test_process_no_flights() {
        let pipeline = ScreenshotPipeline::new(StubProvider {
            text: "Select your flight".to_string(),
        });
        let report = pipeline.process(&ImageInput::from_bytes("empty.png", png(8, 8)));

        assert_eq!(report.status, ImageStatus::NoFlights);
        assert!(report.records.is_empty());
    }

    #[test]
    fn test_unreadable_image_does_not_stop_batch() {
        let pipeline = ScreenshotPipeline::new(StubProvider {
            text: "6E 2341 16:55 18:20 Raipur Kolkata".to_string(),
        });
        let mut queue: ImageQueue = [
            ImageInput::from_bytes("garbage.png", b"not an image".to_vec()),
            ImageInput::from_bytes("good.png", png(8, 8)),
        ]
        .into_iter()
        .collect();

        let reports = pipeline.run(&mut queue);

        assert!(queue.is_empty());
        assert_eq!(reports.len(), 2);
        assert!(matches!(reports[0].status, ImageStatus::Unreadable(_)));
        assert_eq!(reports[1].status, ImageStatus::Extracted);
    }

    #[test]
    fn test_ocr_failure_is_reported() {
        let pipeline = ScreenshotPipeline::new(FailingProvider);
        let report = pipeline.process(&ImageInput::from_bytes("shot.png", png(4, 4)));

        assert_eq!(report.status.as_str(), "ocr_failed");
        assert!(report.status.message().unwrap().contains("tesseract not found"));
        assert_eq!(report.layout, None);
    }

    #[test]
    fn test_queue_order_preserved() {
        let pipeline = ScreenshotPipeline::new(WidthProvider)
            .with_preprocessor(ImagePreprocessor::disabled());
        let mut queue = ImageQueue::new();
        for width in [3, 1, 2] {
            queue.push(ImageInput::from_bytes(format!("{width}.png"), png(width, 1)));
        }
        assert_eq!(queue.len(), 3);

        let reports = pipeline.run(&mut queue);
        let numbers: Vec<String> = collect_records(&reports)
            .into_iter()
            .filter_map(|r| r.flight_number)
            .collect();

        assert_eq!(numbers, vec!["6E 3", "6E 1", "6E 2"]);
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = ImageInput::from_path(Path::new("/nonexistent/flocr/shot.png"));
        assert!(result.is_err());
    }
}
