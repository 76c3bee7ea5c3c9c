//! Error types for the flocr-core library.

use thiserror::Error;

/// Main error type for the flocr library.
#[derive(Error, Debug)]
pub enum FlocrError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image decoding or encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A pattern built from configuration failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by OCR providers.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR backend is not installed or cannot be started.
    #[error("OCR backend not available: {0}")]
    BackendNotAvailable(String),

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Result type for the flocr library.
pub type Result<T> = std::result::Result<T, FlocrError>;
