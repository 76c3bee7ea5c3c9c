//! Common regex patterns for flight screenshot extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Flight number anchors for the default carrier (IndiGo, "6E 2341")
    pub static ref DEFAULT_ANCHOR: Regex = anchor_pattern(&["6E"]).unwrap();

    pub static ref DEFAULT_FLIGHT_NUMBER: Regex = flight_number_pattern(&["6E"]).unwrap();

    pub static ref DEFAULT_CARRIER_MARKER: Regex = carrier_marker_pattern(&["Indigo"]).unwrap();

    // Any airline designator followed by a number ("AI 101", "6E2341").
    // Upper case only, so "to 12" in place text is not a flight.
    pub static ref FLIGHT_DESIGNATOR: Regex = Regex::new(
        r"\b(?:[A-Z]{2}|[A-Z]\d|\d[A-Z])[ \t]?\d{1,4}\b(?:\.[ \t]*[A-Za-z0-9]+)?"
    ).unwrap();

    // 24h clock times
    pub static ref TIME: Regex = Regex::new(
        r"\b(?:[01]?\d|2[0-3]):[0-5]\d\b"
    ).unwrap();

    // Durations ("2h 15m", "01h 25m", "3h", "2h 15min")
    pub static ref DURATION: Regex = Regex::new(
        r"(?i)\b\d{1,2}h(?:\s*\d{1,2}m(?:ins?)?)?\b"
    ).unwrap();

    // Start of a layover keyword, also inside merged tokens ("layoverin")
    pub static ref LAYOVER_MARKER: Regex = Regex::new(
        r"(?i)\blayover"
    ).unwrap();

    // Layout markers
    pub static ref LAYOVER_KEYWORD: Regex = Regex::new(
        r"(?i)\blayovers?\b"
    ).unwrap();

    pub static ref COLUMN_HEADER: Regex = Regex::new(
        r"(?i)\b(?:departure|arrival|duration)\b"
    ).unwrap();

    // Detail view header: "DEL-BOM # 6E 2341"
    pub static ref ROUTE_HEADER: Regex = Regex::new(
        r"(?m)^[ \t]*([A-Z]{3})[ \t]*[-–][ \t]*([A-Z]{3})[ \t]*#[ \t]*(.*)$"
    ).unwrap();

    // Airport code pair: "DEL-BOM"
    pub static ref ROUTE_CODES: Regex = Regex::new(
        r"\b([A-Z]{3})[-–]([A-Z]{3})\b"
    ).unwrap();

    // "Operated by IndiGo"
    pub static ref OPERATED_BY: Regex = Regex::new(
        r"(?im)^[ \t]*operated\s+by[ \t:]*(.+?)[ \t]*$"
    ).unwrap();

    // City followed by a terminal: "DELHI (T2)"
    pub static ref TERMINAL_PLACE: Regex = Regex::new(
        r"([A-Za-z][A-Za-z ]*?)[ \t]*\([^)\n]*\)"
    ).unwrap();

    // Capitalized word runs on one line: "Raipur", "New Delhi"
    pub static ref CAPITALIZED_SEQUENCE: Regex = Regex::new(
        r"\b[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*\b"
    ).unwrap();

    pub static ref CAPITALIZED_WORD: Regex = Regex::new(
        r"\b[A-Z][a-z]+\b"
    ).unwrap();

    // Table cell delimiters: pipes, tabs or runs of two or more spaces
    pub static ref CELL_DELIMITER: Regex = Regex::new(
        r"[ \t]*[|\t][ \t]*| {2,}"
    ).unwrap();
}

fn code_alternation(codes: &[&str]) -> String {
    codes
        .iter()
        .map(|code| regex::escape(code.trim()))
        .collect::<Vec<_>>()
        .join("|")
}

/// Pattern marking where a flight begins: carrier code and 1-4 digits.
pub fn anchor_pattern(codes: &[&str]) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b(?:{})[ \t]?\d{{1,4}}\b", code_alternation(codes)))
}

/// Anchor plus an optional dotted suffix ("6E 2341. A321").
pub fn flight_number_pattern(codes: &[&str]) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?i)\b(?:{})[ \t]?\d{{1,4}}\b(?:\.[ \t]*[A-Za-z0-9]+)?",
        code_alternation(codes)
    ))
}

/// Carrier names as whole words, any case ("IndiGo", "INDIGO").
pub fn carrier_marker_pattern(names: &[&str]) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b(?:{})\b", code_alternation(names)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_pattern() {
        assert!(DEFAULT_ANCHOR.is_match("6E 2341"));
        assert!(DEFAULT_ANCHOR.is_match("6e2341"));
        assert!(!DEFAULT_ANCHOR.is_match("6E 23415"));
        assert!(!DEFAULT_ANCHOR.is_match("A6E 2341"));
    }

    #[test]
    fn test_anchor_pattern_multiple_codes() {
        let pattern = anchor_pattern(&["6E", "AI"]).unwrap();
        assert!(pattern.is_match("AI 101"));
        assert!(pattern.is_match("6E 12"));
        assert!(!pattern.is_match("UK 955"));
    }

    #[test]
    fn test_codes_are_escaped() {
        let pattern = anchor_pattern(&["A.", "6E"]).unwrap();
        assert!(!pattern.is_match("AB 12"));
    }

    #[test]
    fn test_carrier_marker() {
        assert!(DEFAULT_CARRIER_MARKER.is_match("IndiGo 16:55"));
        assert!(!DEFAULT_CARRIER_MARKER.is_match("Indigoes"));

        let pattern = carrier_marker_pattern(&["Indigo", "Air India"]).unwrap();
        assert!(pattern.is_match("AIR INDIA | AI 101"));
    }

    #[test]
    fn test_flight_designator_is_upper_case() {
        assert!(FLIGHT_DESIGNATOR.is_match("AI 101"));
        assert!(FLIGHT_DESIGNATOR.is_match("6E2341"));
        assert!(!FLIGHT_DESIGNATOR.is_match("Pune on 12 May"));
        assert!(!FLIGHT_DESIGNATOR.is_match("walk to 4"));
    }

    #[test]
    fn test_time_pattern() {
        let times: Vec<&str> = TIME.find_iter("16:55 - 24:10 - 9:05 - 18:61").map(|m| m.as_str()).collect();
        assert_eq!(times, vec!["16:55", "9:05"]);
    }

    #[test]
    fn test_duration_minute_suffixes() {
        let durations: Vec<&str> = DURATION
            .find_iter("2h 15min, 1h 30mins, 01h 25m, 3h")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(durations, vec!["2h 15min", "1h 30mins", "01h 25m", "3h"]);
    }

    #[test]
    fn test_route_header() {
        let caps = ROUTE_HEADER.captures("DEL-BOM # 6E 2341").unwrap();
        assert_eq!(&caps[1], "DEL");
        assert_eq!(&caps[2], "BOM");
        assert_eq!(&caps[3], "6E 2341");
    }

    #[test]
    fn test_cell_delimiter() {
        let cells: Vec<&str> = CELL_DELIMITER.split("Indigo | 6E 2341\tRaipur  Kolkata").collect();
        assert_eq!(cells, vec!["Indigo", "6E 2341", "Raipur", "Kolkata"]);
    }
}
