//! Rule-based field extractors for flight screenshots.

pub mod carrier;
pub mod duration;
pub mod flight_number;
pub mod patterns;
pub mod route;
pub mod times;

pub use carrier::extract_operated_by;
pub use duration::{extract_duration, extract_layover, DurationExtractor, LayoverExtractor};
pub use flight_number::{extract_flight_number, FlightNumberExtractor};
pub use route::{extract_terminal_places, Route, RouteExtractor};
pub use times::{extract_times, TimeExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the leftmost occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field, left to right.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A matched field value with its location in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    /// Whether this match lies inside the byte range `start..end`.
    pub fn is_within(&self, start: usize, end: usize) -> bool {
        matches!(self.position, Some((s, e)) if s >= start && e <= end)
    }
}
