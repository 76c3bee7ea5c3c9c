//! Screenshot OCR: image cleanup and text recognition backends.

mod preprocessing;
#[cfg(feature = "native")]
mod pure_engine;
#[cfg(feature = "native")]
mod tesseract;

pub use preprocessing::ImagePreprocessor;
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;
#[cfg(feature = "native")]
pub use tesseract::TesseractProvider;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;
#[cfg(feature = "native")]
use crate::models::config::{OcrConfig, OcrEngineKind};

/// A text recognition backend.
pub trait OcrProvider {
    /// Backend name for logs and reports.
    fn name(&self) -> &str;

    /// Recognize the text of a screenshot, one output line per text row.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

impl<P: OcrProvider + ?Sized> OcrProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        (**self).recognize(image)
    }
}

/// Build the provider selected in the configuration.
#[cfg(feature = "native")]
pub fn create_provider(config: &OcrConfig) -> Result<Box<dyn OcrProvider>, OcrError> {
    match config.engine {
        OcrEngineKind::Tesseract => Ok(Box::new(TesseractProvider::from_config(config))),
        OcrEngineKind::Onnx => Ok(Box::new(PureOcrEngine::from_config(config.clone())?)),
    }
}

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Quadrilateral corners (x1, y1, x2, y2, x3, y3, x4, y4).
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    pub fn new(bbox: [f32; 8], text: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            text: text.into(),
            confidence,
        }
    }

    /// Box from an axis-aligned rectangle.
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32, text: impl Into<String>) -> Self {
        Self::new(
            [x, y, x + width, y, x + width, y + height, x, y + height],
            text,
            1.0,
        )
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> (f32, f32) {
        let x = (self.bbox[0] + self.bbox[2] + self.bbox[4] + self.bbox[6]) / 4.0;
        let y = (self.bbox[1] + self.bbox[3] + self.bbox[5] + self.bbox[7]) / 4.0;
        (x, y)
    }

    /// Get the axis-aligned bounding rectangle (min_x, min_y, max_x, max_y).
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Join text boxes into lines of text.
///
/// Boxes whose vertical centers lie within `row_tolerance` of a row's first
/// box share that row. Rows are ordered top to bottom, boxes in a row left
/// to right and separated by two spaces so that table cells stay apart.
pub fn boxes_to_text(boxes: &[TextBox], row_tolerance: f32) -> String {
    let mut sorted: Vec<&TextBox> = boxes.iter().filter(|b| !b.text.trim().is_empty()).collect();
    sorted.sort_by(|a, b| a.center().1.total_cmp(&b.center().1));

    let mut rows: Vec<(f32, Vec<&TextBox>)> = Vec::new();
    for text_box in sorted {
        let y = text_box.center().1;
        match rows.last_mut() {
            Some((row_y, row)) if (y - *row_y).abs() <= row_tolerance => row.push(text_box),
            _ => rows.push((y, vec![text_box])),
        }
    }

    rows.into_iter()
        .map(|(_, mut row)| {
            row.sort_by(|a, b| a.rect().0.total_cmp(&b.rect().0));
            row.iter()
                .map(|b| b.text.trim())
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_boxes_to_text_rows() {
        let boxes = vec![
            TextBox::from_rect(300.0, 52.0, 60.0, 20.0, "18:20"),
            TextBox::from_rect(10.0, 10.0, 80.0, 20.0, "IndiGo"),
            TextBox::from_rect(10.0, 50.0, 80.0, 20.0, "6E 2341"),
            TextBox::from_rect(150.0, 48.0, 60.0, 20.0, "16:55"),
            TextBox::from_rect(10.0, 120.0, 80.0, 20.0, "  "),
        ];

        assert_eq!(boxes_to_text(&boxes, 15.0), "IndiGo\n6E 2341  16:55  18:20");
    }

    #[test]
    fn test_boxes_to_text_tolerance() {
        let boxes = vec![
            TextBox::from_rect(10.0, 10.0, 50.0, 20.0, "Raipur"),
            TextBox::from_rect(100.0, 22.0, 50.0, 20.0, "Kolkata"),
        ];

        assert_eq!(boxes_to_text(&boxes, 15.0), "Raipur  Kolkata");
        assert_eq!(boxes_to_text(&boxes, 5.0), "Raipur\nKolkata");
        assert_eq!(boxes_to_text(&[], 15.0), "");
    }

    #[test]
    fn test_text_box_geometry() {
        let text_box = TextBox::from_rect(10.0, 20.0, 100.0, 30.0, "6E 2341");
        assert_eq!(text_box.center(), (60.0, 35.0));
        assert_eq!(text_box.rect(), (10.0, 20.0, 110.0, 50.0));
    }
}
