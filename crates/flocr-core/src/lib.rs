//! Core library for flight itinerary OCR.
//!
//! This crate provides:
//! - OCR text normalization and layout classification (tabular, block, detail)
//! - Flight field extraction (flight numbers, cities, times, durations, layovers)
//! - Flight record assembly in a fixed spreadsheet column order
//! - Screenshot preprocessing and OCR providers (tesseract, pure-onnx-ocr)

pub mod error;
pub mod itinerary;
pub mod models;
pub mod ocr;
#[cfg(feature = "native")]
pub mod pipeline;

pub use error::{FlocrError, OcrError, Result};
pub use itinerary::{
    classify_layout, normalize_text, ExtractionResult, FlightParser, ItineraryParser, LayoutKind,
};
pub use models::flight::{FlightRecord, COLUMNS};
pub use models::FlocrConfig;
pub use ocr::{boxes_to_text, ImagePreprocessor, OcrProvider, TextBox};
#[cfg(feature = "native")]
pub use ocr::{create_provider, PureOcrEngine, TesseractProvider};
#[cfg(feature = "native")]
pub use pipeline::{
    collect_records, ImageInput, ImageQueue, ImageReport, ImageStatus, ScreenshotPipeline,
};

/// Extract flight records from OCR text with the default parser.
pub fn extract_flights(text: &str) -> Vec<FlightRecord> {
    FlightParser::new().extract_records(text)
}
