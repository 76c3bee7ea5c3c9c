//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::itinerary::LayoutKind;

/// Main configuration for the flocr pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlocrConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Image preprocessing configuration.
    pub preprocessing: PreprocessConfig,

    /// Flight extraction configuration.
    pub extraction: ExtractionConfig,

    /// Spreadsheet export configuration.
    pub export: ExportConfig,
}

/// Which OCR backend recognizes screenshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngineKind {
    /// The `tesseract` command-line tool.
    #[default]
    Tesseract,
    /// PaddleOCR ONNX models run by `pure-onnx-ocr`.
    Onnx,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Backend to use.
    pub engine: OcrEngineKind,

    /// Path or name of the tesseract executable.
    pub tesseract_binary: String,

    /// Tesseract language pack.
    pub language: String,

    /// Tesseract OCR engine mode (`--oem`).
    pub oem: u8,

    /// Tesseract page segmentation mode (`--psm`).
    pub psm: u8,

    /// Directory containing ONNX model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` markers emitted by the recognizer.
    pub keep_unk: bool,

    /// Vertical distance (pixels) under which text boxes share a line.
    pub row_tolerance: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngineKind::Tesseract,
            tesseract_binary: "tesseract".to_string(),
            language: "eng".to_string(),
            oem: 3,
            psm: 6,
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
            row_tolerance: 15.0,
        }
    }
}

/// Image preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Run preprocessing before OCR.
    pub enabled: bool,

    /// Images whose longer side is below this are upscaled.
    pub upscale_below: u32,

    /// Upscale factor.
    pub scale: f32,

    /// Median filter radius (0 disables the filter).
    pub median_radius: u32,

    /// Binarize with an Otsu threshold.
    pub binarize: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            upscale_below: 1500,
            scale: 2.0,
            median_radius: 1,
            binarize: true,
        }
    }
}

/// A carrier whose flight numbers anchor records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierProfile {
    /// Two-character designator printed before the flight number.
    pub code: String,
    /// Name written to the Carrier column.
    pub name: String,
}

impl CarrierProfile {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Flight extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Carrier used when nothing on the screenshot names another one.
    pub default_carrier: String,

    /// Carriers whose codes are recognized as flight-number anchors.
    pub carriers: Vec<CarrierProfile>,

    /// Force a layout instead of classifying each text.
    pub layout: Option<LayoutKind>,

    /// Extra literal OCR corrections, applied after the built-in table.
    pub ocr_substitutions: Vec<(String, String)>,

    /// Capitalized words never taken as city names.
    pub ignored_words: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_carrier: "Indigo".to_string(),
            carriers: vec![CarrierProfile::new("6E", "Indigo")],
            layout: None,
            ocr_substitutions: Vec::new(),
            ignored_words: ["Departure", "Arrival", "Duration", "Layover"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values, one row per flight.
    #[default]
    Csv,
    /// JSON document.
    Json,
    /// Aligned plain-text table.
    Text,
}

/// Spreadsheet export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default output format.
    pub format: ExportFormat,

    /// Default output file.
    pub output: PathBuf,

    /// CSV field delimiter.
    pub delimiter: char,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            output: PathBuf::from("extracted_flights.csv"),
            delimiter: ',',
        }
    }
}

impl FlocrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.ocr.model_dir.join(model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FlocrConfig =
            serde_json::from_str(r#"{"extraction": {"layout": "block"}, "ocr": {"psm": 4}}"#)
                .unwrap();

        assert_eq!(config.extraction.layout, Some(LayoutKind::Block));
        assert_eq!(config.extraction.default_carrier, "Indigo");
        assert_eq!(config.ocr.psm, 4);
        assert_eq!(config.ocr.oem, 3);
        assert!(config.preprocessing.binarize);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FlocrConfig::default();
        config.extraction.carriers.push(CarrierProfile::new("AI", "Air India"));
        config.export.format = ExportFormat::Json;
        config.save(&path).unwrap();

        let loaded = FlocrConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.carriers, config.extraction.carriers);
        assert_eq!(loaded.export.format, ExportFormat::Json);
    }
}
