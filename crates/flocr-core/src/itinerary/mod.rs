//! Flight itinerary extraction from OCR text.
//!
//! Raw text is normalized, classified into a layout, split into one span
//! per flight and handed to the field extractors in [`rules`].

mod layout;
mod normalizer;
mod parser;
pub mod rules;
mod segmenter;

pub use layout::{classify_layout, LayoutKind};
pub use normalizer::{normalize_text, TextNormalizer, OCR_SUBSTITUTIONS};
pub use parser::{ExtractionResult, FlightParser};
pub use segmenter::{segment_blocks, segment_detail, TextSpan};

use crate::models::FlightRecord;

/// Trait for turning OCR text into flight records.
pub trait ItineraryParser {
    /// Parse text into records plus layout and diagnostics.
    fn parse(&self, text: &str) -> ExtractionResult;

    /// Parse text and keep only the records.
    fn extract_records(&self, text: &str) -> Vec<FlightRecord> {
        self.parse(text).records
    }
}
