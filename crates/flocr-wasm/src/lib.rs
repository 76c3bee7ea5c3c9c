//! WASM bindings for flight itinerary extraction.
//!
//! The browser page owns screenshot upload and paste, and may run OCR
//! itself; these bindings turn the recognized text into flight records.

use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::console;

use flocr_core::models::config::ExtractionConfig;
use flocr_core::{
    boxes_to_text, ExtractionResult, FlightParser, FlightRecord, ItineraryParser, LayoutKind,
    TextBox, COLUMNS,
};

/// Vertical distance under which browser OCR boxes share a line.
const DEFAULT_ROW_TOLERANCE: f32 = 15.0;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract flight records from OCR text with the default settings.
#[wasm_bindgen]
pub fn extract_flights_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&FlightParser::new().extract_records(text))
}

/// Layout ("tabular", "block" or "detail") the text would be parsed with.
#[wasm_bindgen]
pub fn classify_layout(text: &str) -> String {
    flocr_core::classify_layout(&flocr_core::normalize_text(text)).to_string()
}

/// Apply the OCR cleanup used before parsing.
#[wasm_bindgen]
pub fn normalize_text(text: &str) -> String {
    flocr_core::normalize_text(text)
}

/// Spreadsheet column headers, in export order.
#[wasm_bindgen]
pub fn columns() -> Array {
    COLUMNS.iter().map(|c| JsValue::from_str(c)).collect()
}

/// Flight extractor class for browser use.
#[wasm_bindgen]
pub struct FlightExtractor {
    parser: FlightParser,
}

#[wasm_bindgen]
impl FlightExtractor {
    /// Create an extractor; `config` is an optional JSON extraction config.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<FlightExtractor, JsValue> {
        let parser = match config {
            Some(json) => {
                let config: ExtractionConfig =
                    serde_json::from_str(&json).map_err(|e| JsValue::from_str(&e.to_string()))?;
                FlightParser::from_config(&config).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => FlightParser::new(),
        };

        Ok(Self { parser })
    }

    /// Force a layout ("tabular", "block", "detail"); an empty string restores detection.
    #[wasm_bindgen]
    pub fn set_layout(&mut self, layout: &str) -> Result<(), JsValue> {
        let layout = if layout.trim().is_empty() {
            None
        } else {
            Some(layout.parse::<LayoutKind>().map_err(|e| JsValue::from_str(&e))?)
        };
        self.parser = self.parser.clone().with_layout(layout);
        Ok(())
    }

    /// Set the carrier used when nothing names another one.
    #[wasm_bindgen]
    pub fn set_default_carrier(&mut self, carrier: &str) {
        self.parser = self.parser.clone().with_default_carrier(carrier);
    }

    /// Extract flight records from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parse(text).records)
    }

    /// Extract records together with layout, normalized text and warnings.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parse(text))
    }

    /// Records as rows of strings in column order, for spreadsheet export.
    #[wasm_bindgen]
    pub fn to_rows(&self, text: &str) -> Array {
        rows(&self.parse(text).records)
    }

    fn parse(&self, text: &str) -> ExtractionResult {
        let result = self.parser.parse(text);
        for warning in &result.warnings {
            console::warn_1(&JsValue::from_str(warning));
        }
        result
    }
}

/// OCR result from browser-side processing.
#[wasm_bindgen]
pub struct OcrResultJs {
    boxes: Vec<TextBox>,
    text: String,
    row_tolerance: f32,
}

#[wasm_bindgen]
impl OcrResultJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            boxes: Vec::new(),
            text: String::new(),
            row_tolerance: DEFAULT_ROW_TOLERANCE,
        }
    }

    /// Add a text box to the result.
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn add_box(
        &mut self,
        text: &str,
        x1: f32, y1: f32,
        x2: f32, y2: f32,
        x3: f32, y3: f32,
        x4: f32, y4: f32,
        confidence: f32,
    ) {
        self.boxes.push(TextBox::new(
            [x1, y1, x2, y2, x3, y3, x4, y4],
            text,
            confidence,
        ));
    }

    /// Set the vertical tolerance used to group boxes into lines.
    #[wasm_bindgen]
    pub fn set_row_tolerance(&mut self, tolerance: f32) {
        self.row_tolerance = tolerance;
    }

    /// Set the full text, overriding the boxes.
    #[wasm_bindgen]
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Get the full text; without explicit text the boxes are joined into lines.
    #[wasm_bindgen]
    pub fn get_text(&self) -> String {
        if self.text.is_empty() {
            boxes_to_text(&self.boxes, self.row_tolerance)
        } else {
            self.text.clone()
        }
    }

    /// Extract flight records from this OCR result.
    #[wasm_bindgen]
    pub fn extract_flights(&self) -> Result<JsValue, JsValue> {
        extract_flights_from_text(&self.get_text())
    }
}

impl Default for OcrResultJs {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn rows(records: &[FlightRecord]) -> Array {
    records
        .iter()
        .map(|record| {
            record
                .to_row()
                .iter()
                .map(|cell| JsValue::from_str(cell))
                .collect::<Array>()
        })
        .collect()
}
