//! Flight number extraction.

use regex::Regex;

use super::patterns::{anchor_pattern, flight_number_pattern, DEFAULT_ANCHOR, DEFAULT_FLIGHT_NUMBER};
use super::{ExtractionMatch, FieldExtractor};

/// Flight number extractor for a set of carrier codes.
#[derive(Debug, Clone)]
pub struct FlightNumberExtractor {
    anchor: Regex,
    pattern: Regex,
}

impl FlightNumberExtractor {
    /// Create an extractor for the default carrier code ("6E").
    pub fn new() -> Self {
        Self {
            anchor: DEFAULT_ANCHOR.clone(),
            pattern: DEFAULT_FLIGHT_NUMBER.clone(),
        }
    }

    /// Create an extractor recognizing any of the given carrier codes.
    pub fn for_codes(codes: &[&str]) -> Result<Self, regex::Error> {
        if codes.is_empty() {
            return Ok(Self::new());
        }

        Ok(Self {
            anchor: anchor_pattern(codes)?,
            pattern: flight_number_pattern(codes)?,
        })
    }

    /// Pattern marking the start of a flight, without the dotted suffix.
    pub fn anchor(&self) -> &Regex {
        &self.anchor
    }

    /// Whether the text contains at least one flight number.
    pub fn is_match(&self, text: &str) -> bool {
        self.anchor.is_match(text)
    }
}

impl Default for FlightNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for FlightNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().trim().to_string(), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Extract the leftmost default-carrier flight number from text.
pub fn extract_flight_number(text: &str) -> Option<String> {
    FlightNumberExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_flight_number() {
        assert_eq!(
            extract_flight_number("IndiGo 6E 2341 16:55"),
            Some("6E 2341".to_string())
        );
        assert_eq!(extract_flight_number("6E2341"), Some("6E2341".to_string()));
        assert_eq!(extract_flight_number("no flight here 2341"), None);
    }

    #[test]
    fn test_dotted_suffix() {
        assert_eq!(
            extract_flight_number("6E 2341. A321 Economy"),
            Some("6E 2341. A321".to_string())
        );
    }

    #[test]
    fn test_leftmost_match_wins() {
        let extractor = FlightNumberExtractor::new();
        let all = extractor.extract_all("6E 12 then 6E 3456");

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].value, "6E 12");
        assert_eq!(all[0].position, Some((0, 5)));
        assert_eq!(extractor.extract("6E 12 then 6E 3456").unwrap().value, "6E 12");
    }

    #[test]
    fn test_custom_codes() {
        let extractor = FlightNumberExtractor::for_codes(&["AI", "UK"]).unwrap();
        assert_eq!(extractor.extract("UK 955 Vistara").unwrap().value, "UK 955");
        assert!(!extractor.is_match("6E 2341"));
    }

    #[test]
    fn test_deterministic() {
        let extractor = FlightNumberExtractor::new();
        let text = "6E 5309 Kolkata 19:55";
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }
}
