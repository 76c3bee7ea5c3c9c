//! Splitting OCR text into one span per flight.

use regex::Regex;
use tracing::trace;

use super::rules::patterns::ROUTE_HEADER;

/// A contiguous slice of normalized text believed to describe one flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> TextSpan<'a> {
    pub fn new(text: &'a str, offset: usize) -> Self {
        Self { text, offset }
    }

    /// Span text.
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Byte offset of the span in the segmented text.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Non-empty, trimmed lines of the span.
    pub fn lines(&self) -> impl Iterator<Item = &'a str> {
        self.text.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Split text at every position where `anchor` matches.
///
/// The anchor stays at the start of the span it introduces. Text before
/// the first anchor is header noise and is discarded, as is any span that
/// does not contain an anchor.
pub fn segment_blocks<'a>(text: &'a str, anchor: &Regex) -> Vec<TextSpan<'a>> {
    split_at(text, anchor.find_iter(text).map(|m| m.start()).collect())
        .into_iter()
        .filter(|span| {
            let anchored = anchor.is_match(span.as_str());
            if !anchored {
                trace!("Discarding span at {} without flight number", span.offset());
            }
            anchored
        })
        .collect()
}

/// Split detail-view text at every route header line ("DEL-BOM # 6E 2341").
pub fn segment_detail(text: &str) -> Vec<TextSpan<'_>> {
    split_at(text, ROUTE_HEADER.find_iter(text).map(|m| m.start()).collect())
}

fn split_at(text: &str, starts: Vec<usize>) -> Vec<TextSpan<'_>> {
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            TextSpan::new(&text[start..end], start)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::rules::patterns::DEFAULT_ANCHOR;

    #[test]
    fn test_no_anchor_no_spans() {
        assert!(segment_blocks("Raipur 16:55 Kolkata 18:20", &DEFAULT_ANCHOR).is_empty());
        assert!(segment_blocks("", &DEFAULT_ANCHOR).is_empty());
    }

    #[test]
    fn test_one_span_per_anchor() {
        let text = "Results\n6E 2341 Raipur\n16:55\n6E 5309 Kolkata\n19:55\n6E 771 Goa";
        let spans = segment_blocks(text, &DEFAULT_ANCHOR);

        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].as_str(), "6E 2341 Raipur\n16:55\n");
        assert_eq!(spans[1].as_str(), "6E 5309 Kolkata\n19:55\n");
        assert_eq!(spans[2].as_str(), "6E 771 Goa");
        assert!(spans.windows(2).all(|w| w[0].offset() < w[1].offset()));
        for span in &spans {
            assert!(span.as_str().starts_with("6E"));
        }
    }

    #[test]
    fn test_preamble_discarded() {
        let spans = segment_blocks("Select your flight 1h 30m layover\n6E 12 X", &DEFAULT_ANCHOR);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].as_str(), "6E 12 X");
        assert_eq!(spans[0].offset(), 34);
    }

    #[test]
    fn test_single_line_concatenation() {
        let spans = segment_blocks("6E 1 10:00 12:00 6E 2 13:00 15:00", &DEFAULT_ANCHOR);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].as_str(), "6E 1 10:00 12:00 ");
        assert_eq!(spans[1].as_str(), "6E 2 13:00 15:00");
    }

    #[test]
    fn test_span_lines() {
        let span = TextSpan::new("6E 1\n  Raipur \n\n16:55", 0);
        assert_eq!(span.lines().collect::<Vec<_>>(), vec!["6E 1", "Raipur", "16:55"]);
    }

    #[test]
    fn test_segment_detail() {
        let text = "Your trip\nDEL-BOM # 6E 2341\n06:00 08:10\nBOM-GOI # 6E 511\n10:00 11:15";
        let spans = segment_detail(text);

        assert_eq!(spans.len(), 2);
        assert!(spans[0].as_str().starts_with("DEL-BOM"));
        assert!(spans[1].as_str().starts_with("BOM-GOI"));
    }
}
