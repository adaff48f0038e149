//! Identity card field extraction module.

mod parser;
pub mod rules;

pub use parser::{CardParser, ExtractionResult};

use crate::error::ExtractionError;
use crate::models::card::CardRecord;
use crate::ocr::RawText;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for card field extractors.
pub trait CardExtractor {
    /// Extract card fields from OCR output.
    fn extract(&self, raw: &RawText) -> Result<CardRecord>;

    /// Extract card fields from plain text.
    fn extract_from_text(&self, text: &str) -> Result<CardRecord>;
}
