//! Departure and arrival time extraction.

use super::patterns::TIME;
use super::{ExtractionMatch, FieldExtractor};

/// 24h clock time extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeExtractor;

impl TimeExtractor {
    pub fn new() -> Self {
        Self
    }

    /// First time is the departure, second the arrival.
    pub fn extract_pair(&self, text: &str) -> (Option<String>, Option<String>) {
        let mut times = self.extract_all(text).into_iter().map(|m| m.value);
        let departure = times.next();
        let arrival = times.next();
        (departure, arrival)
    }

    /// Whether the text contains a clock time.
    pub fn contains_time(&self, text: &str) -> bool {
        TIME.is_match(text)
    }
}

impl FieldExtractor for TimeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        TIME.find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Extract departure and arrival times from text.
pub fn extract_times(text: &str) -> (Option<String>, Option<String>) {
    TimeExtractor::new().extract_pair(text)
}
