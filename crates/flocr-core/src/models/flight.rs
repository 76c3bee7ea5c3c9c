//! Flight record model and the fixed export column set.

use serde::{Deserialize, Serialize};

/// Export column headers, in output order.
pub const COLUMNS: [&str; 8] = [
    "Carrier",
    "Flight No.",
    "From",
    "To",
    "Departure",
    "Arrival",
    "Duration",
    "Layover Time",
];

/// One flight segment recovered from a screenshot.
///
/// Every field except `carrier` is optional: OCR output is noisy and a
/// record is still worth emitting when only its flight number was read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Operating carrier name.
    pub carrier: String,

    /// Flight number as printed (e.g. "6E 2341").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,

    /// Origin city or airport code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Destination city or airport code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    /// Departure time (HH:MM).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure: Option<String>,

    /// Arrival time (HH:MM).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival: Option<String>,

    /// Flight duration as printed (e.g. "2h 15m").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Connection wait time following this flight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layover_time: Option<String>,
}

impl FlightRecord {
    /// Create an empty record for the given carrier.
    pub fn new(carrier: impl Into<String>) -> Self {
        Self {
            carrier: carrier.into(),
            ..Default::default()
        }
    }

    /// Trim every field, drop empty values and title-case city names.
    ///
    /// Applying this more than once yields the same record.
    pub fn normalized(self) -> Self {
        Self {
            carrier: self.carrier.trim().to_string(),
            flight_number: clean(self.flight_number),
            from: clean(self.from).map(|v| format_place(&v)),
            to: clean(self.to).map(|v| format_place(&v)),
            departure: clean(self.departure),
            arrival: clean(self.arrival),
            duration: clean(self.duration),
            layover_time: clean(self.layover_time),
        }
    }

    /// Field values in [`COLUMNS`] order, with missing fields as "".
    pub fn to_row(&self) -> [&str; 8] {
        [
            self.carrier.as_str(),
            self.flight_number.as_deref().unwrap_or(""),
            self.from.as_deref().unwrap_or(""),
            self.to.as_deref().unwrap_or(""),
            self.departure.as_deref().unwrap_or(""),
            self.arrival.as_deref().unwrap_or(""),
            self.duration.as_deref().unwrap_or(""),
            self.layover_time.as_deref().unwrap_or(""),
        ]
    }

    /// Whether any departure, arrival or duration was recovered.
    pub fn has_schedule(&self) -> bool {
        self.departure.is_some() || self.arrival.is_some() || self.duration.is_some()
    }

    /// Names of the secondary fields that were not recovered.
    ///
    /// Layover is not counted: most flights have none.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("Flight No.", &self.flight_number),
            ("From", &self.from),
            ("To", &self.to),
            ("Departure", &self.departure),
            ("Arrival", &self.arrival),
            ("Duration", &self.duration),
        ];

        fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect()
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Airport codes stay upper case, anything else is a city name.
fn format_place(value: &str) -> String {
    if is_airport_code(value) {
        value.to_string()
    } else {
        title_case(value)
    }
}

/// Three upper-case ASCII letters, e.g. "DEL".
pub fn is_airport_code(value: &str) -> bool {
    value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase())
}

/// Title-case a string: the first letter of every alphabetic run is upper
/// case, the rest lower case. Non-letters are kept as they are.
pub fn title_case(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut previous_alpha = false;

    for c in value.chars() {
        if c.is_alphabetic() {
            let mapped = if previous_alpha {
                single_char(c.to_lowercase(), c)
            } else {
                single_char(c.to_uppercase(), c)
            };
            output.push(mapped);
            previous_alpha = true;
        } else {
            output.push(c);
            previous_alpha = false;
        }
    }

    output
}

/// Case mappings that expand to several characters (e.g. 'ß') are skipped
/// so that title-casing stays idempotent.
fn single_char(mut mapping: impl Iterator<Item = char>, original: char) -> char {
    match (mapping.next(), mapping.next()) {
        (Some(c), None) => c,
        _ => original,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("NEW DELHI"), "New Delhi");
        assert_eq!(title_case("kolkata"), "Kolkata");
        assert_eq!(title_case("DELHI (T2)"), "Delhi (T2)");
        assert_eq!(title_case("port-blair"), "Port-Blair");
    }

    #[test]
    fn test_title_case_idempotent() {
        for input in ["NEW DELHI", "raipur", "Straße", "ǆemal", "6e 2341", "mUMBAI (t1)"] {
            let once = title_case(input);
            assert_eq!(title_case(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_normalized_trims_and_drops_empty() {
        let record = FlightRecord {
            carrier: " Indigo ".to_string(),
            flight_number: Some(" 6E 2341\n".to_string()),
            from: Some("  RAIPUR ".to_string()),
            to: Some("kolkata".to_string()),
            departure: Some("16:55".to_string()),
            arrival: Some("   ".to_string()),
            duration: None,
            layover_time: Some(String::new()),
        }
        .normalized();

        assert_eq!(record.carrier, "Indigo");
        assert_eq!(record.flight_number.as_deref(), Some("6E 2341"));
        assert_eq!(record.from.as_deref(), Some("Raipur"));
        assert_eq!(record.to.as_deref(), Some("Kolkata"));
        assert_eq!(record.arrival, None);
        assert_eq!(record.layover_time, None);
        assert_eq!(record.clone().normalized(), record);
    }

    #[test]
    fn test_airport_codes_keep_case() {
        let mut record = FlightRecord::new("Indigo");
        record.from = Some("DEL".to_string());
        record.to = Some("bom".to_string());
        let record = record.normalized();

        assert_eq!(record.from.as_deref(), Some("DEL"));
        assert_eq!(record.to.as_deref(), Some("Bom"));
    }

    #[test]
    fn test_row_order_matches_columns() {
        let record = FlightRecord {
            carrier: "Indigo".to_string(),
            flight_number: Some("6E 2341".to_string()),
            from: Some("Raipur".to_string()),
            to: Some("Kolkata".to_string()),
            departure: Some("16:55".to_string()),
            arrival: Some("18:20".to_string()),
            duration: Some("01h 25m".to_string()),
            layover_time: None,
        };

        assert_eq!(COLUMNS.len(), record.to_row().len());
        assert_eq!(
            record.to_row(),
            ["Indigo", "6E 2341", "Raipur", "Kolkata", "16:55", "18:20", "01h 25m", ""]
        );
        assert!(record.missing_fields().is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let mut record = FlightRecord::new("Indigo");
        record.flight_number = Some("6E 12".to_string());

        assert_eq!(
            record.missing_fields(),
            vec!["From", "To", "Departure", "Arrival", "Duration"]
        );
    }
}
