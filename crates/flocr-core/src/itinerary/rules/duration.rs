//! Flight duration and layover extraction.

use super::patterns::{DURATION, LAYOVER_MARKER};
use super::{ExtractionMatch, FieldExtractor};

/// Flight duration extractor ("2h 15m").
///
/// Durations that belong to a layover expression ("1h 30m layover") are
/// not flight durations and are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationExtractor;

impl DurationExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for DurationExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let layovers = LayoverExtractor::new().extract_all(text);

        DURATION
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().trim().to_string(), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .filter(|candidate| {
                !layovers.iter().any(|layover| match layover.position {
                    Some((start, end)) => candidate.is_within(start, end),
                    None => false,
                })
            })
            .collect()
    }
}

/// Characters allowed between a layover duration and its keyword.
const LAYOVER_GAP: usize = 30;

/// Layover extractor: the last duration before the word "layover" on the
/// same line, at most 30 characters ahead of it. The value is the
/// duration part only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoverExtractor;

impl LayoverExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for LayoverExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let durations: Vec<_> = DURATION.find_iter(text).collect();
        let mut matches: Vec<Self::Output> = Vec::new();

        for keyword in LAYOVER_MARKER.find_iter(text) {
            let nearest = durations
                .iter()
                .take_while(|d| d.end() <= keyword.start())
                .last()
                .filter(|d| {
                    let gap = &text[d.end()..keyword.start()];
                    !gap.contains('\n') && gap.chars().count() <= LAYOVER_GAP
                });

            let Some(duration) = nearest else { continue };
            if matches.last().and_then(|m| m.position) == Some((duration.start(), duration.end())) {
                continue;
            }

            matches.push(
                ExtractionMatch::new(
                    duration.as_str().trim().to_string(),
                    &text[duration.start()..keyword.end()],
                )
                .with_position(duration.start(), duration.end()),
            );
        }

        matches
    }
}

/// Extract the flight duration from text.
pub fn extract_duration(text: &str) -> Option<String> {
    DurationExtractor::new().extract(text).map(|m| m.value)
}

/// Extract the layover time from text.
pub fn extract_layover(text: &str) -> Option<String> {
    LayoverExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_duration() {
        assert_eq!(extract_duration("Nonstop 01h 25m"), Some("01h 25m".to_string()));
        assert_eq!(extract_duration("2h15m"), Some("2h15m".to_string()));
        assert_eq!(extract_duration("approx 3h"), Some("3h".to_string()));
        assert_eq!(extract_duration("16:55 18:20"), None);
    }

    #[test]
    fn test_extract_layover() {
        assert_eq!(extract_layover("1h 30m layover in Delhi"), Some("1h 30m".to_string()));
        assert_eq!(extract_layover("2h 05m  Layover"), Some("2h 05m".to_string()));
        assert_eq!(extract_layover("1h 30m"), None);
    }

    #[test]
    fn test_layover_keyword_too_far() {
        let text = format!("1h 30m {} layover", "x".repeat(40));
        assert_eq!(extract_layover(&text), None);
    }

    #[test]
    fn test_duration_skips_layover() {
        assert_eq!(extract_duration("1h 30m layover\n02h 35m"), Some("02h 35m".to_string()));
        assert_eq!(extract_duration("1h 30m layover"), None);
    }

    #[test]
    fn test_duration_and_layover_on_one_line() {
        let text = "6E 2341 Raipur Kolkata 01h 25m 1h 30m layover";
        assert_eq!(extract_layover(text), Some("1h 30m".to_string()));
        assert_eq!(extract_duration(text), Some("01h 25m".to_string()));
    }

    #[test]
    fn test_minute_suffixes_kept() {
        assert_eq!(extract_duration("Nonstop 2h 15min"), Some("2h 15min".to_string()));
        assert_eq!(extract_layover("1h 30mins layover"), Some("1h 30mins".to_string()));
        assert_eq!(extract_duration("2h 15min\n1h 30min layover"), Some("2h 15min".to_string()));
    }

    #[test]
    fn test_one_layover_per_duration() {
        let layovers = LayoverExtractor::new().extract_all("2h layover, layover in Delhi\n45m\n3h 05m Layover");
        let values: Vec<&str> = layovers.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["2h", "3h 05m"]);
    }

    #[test]
    fn test_duration_before_layover_kept() {
        assert_eq!(
            extract_duration("01h 25m\n1h 30m layover"),
            Some("01h 25m".to_string())
        );
    }
}
