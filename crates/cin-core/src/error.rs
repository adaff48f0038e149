//! Error types for the cin-core library.

use thiserror::Error;

/// Main error type for the cin library.
#[derive(Error, Debug)]
pub enum CinError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Card field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors related to OCR backends.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The backend cannot run in this environment.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Remote OCR service request failed.
    #[error("request failed: {0}")]
    Request(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to card field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The OCR output contained no text.
    #[error("no text to extract from")]
    NoText,
}

/// Result type for the cin library.
pub type Result<T> = std::result::Result<T, CinError>;
