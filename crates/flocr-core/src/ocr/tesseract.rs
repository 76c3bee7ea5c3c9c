//! Tesseract OCR provider.
//!
//! Runs the `tesseract` command-line tool on a temporary PNG copy of the
//! screenshot and reads the recognized text from stdout.

use std::path::Path;
use std::process::Command;

use image::{DynamicImage, ImageFormat};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::OcrProvider;

/// Tesseract command-line provider.
#[derive(Debug, Clone)]
pub struct TesseractProvider {
    binary: String,
    language: String,
    oem: u8,
    psm: u8,
}

impl TesseractProvider {
    /// Create a provider with default settings (`--oem 3 --psm 6`, English).
    pub fn new() -> Self {
        Self::from_config(&OcrConfig::default())
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            binary: config.tesseract_binary.clone(),
            language: config.language.clone(),
            oem: config.oem,
            psm: config.psm,
        }
    }

    /// Command-line arguments after the input path.
    fn args(&self) -> Vec<String> {
        vec![
            "stdout".to_string(),
            "--oem".to_string(),
            self.oem.to_string(),
            "--psm".to_string(),
            self.psm.to_string(),
            "-l".to_string(),
            self.language.clone(),
        ]
    }

    /// Run tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new(&self.binary)
            .arg(image_path)
            .args(self.args())
            .output();

        match output {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(OcrError::Recognition(format!(
                    "tesseract failed: {}",
                    stderr.trim()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(format!(
                    "{} not found (install tesseract-ocr)",
                    self.binary
                )))
            }
            Err(e) => Err(OcrError::BackendNotAvailable(format!(
                "failed to start {}: {}",
                self.binary, e
            ))),
        }
    }
}

impl Default for TesseractProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrProvider for TesseractProvider {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let temp_dir = tempfile::tempdir()
            .map_err(|e| OcrError::Recognition(format!("failed to create temp dir: {}", e)))?;
        let image_path = temp_dir.path().join("screenshot.png");

        image
            .save_with_format(&image_path, ImageFormat::Png)
            .map_err(|e| OcrError::InvalidImage(format!("failed to write temp image: {}", e)))?;

        debug!("Running {} on {}", self.binary, image_path.display());
        let text = self.run_tesseract(&image_path)?;
        info!("Tesseract recognized {} characters", text.len());

        Ok(text)
    }
}
