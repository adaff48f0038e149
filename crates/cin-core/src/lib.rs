//! Core library for national identity card (CIN) OCR.
//!
//! This crate provides:
//! - Pluggable OCR backends (Google Cloud Vision, ONNX PaddleOCR, Tesseract)
//! - Card field extraction (side, CIN number, dates, MRZ)
//! - A pipeline choosing the first available backend and never failing

pub mod card;
pub mod error;
pub mod models;
pub mod ocr;
pub mod pipeline;

pub use card::{CardExtractor, CardParser, ExtractionResult};
pub use error::{CinError, Result};
pub use models::card::{CardRecord, CardSide};
pub use models::config::CinConfig;
pub use ocr::{OcrBackend, RawText, TextFragment};
pub use pipeline::{CardPipeline, CardPipelineBuilder};
