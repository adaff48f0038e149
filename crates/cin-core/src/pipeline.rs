//! End-to-end card pipeline: pick an OCR backend, recognize, extract.

use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info, warn};

use crate::card::{CardExtractor, CardParser};
use crate::error::CinError;
use crate::models::card::CardRecord;
use crate::models::config::CinConfig;
use crate::ocr::OcrBackend;

/// Runs OCR and field extraction on card images.
///
/// Backends are tried in the order they were added; the first one reporting
/// itself available is used. [`CardPipeline::process`] never fails: errors
/// degrade to [`CardRecord::fallback`].
pub struct CardPipeline {
    backends: Vec<Box<dyn OcrBackend>>,
    parser: CardParser,
}

/// Builder for CardPipeline.
pub struct CardPipelineBuilder {
    backends: Vec<Box<dyn OcrBackend>>,
    parser: CardParser,
}

impl CardPipelineBuilder {
    /// Create a new builder with no backends.
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
            parser: CardParser::new(),
        }
    }

    /// Append a backend with lower priority than those already added.
    pub fn with_backend(mut self, backend: Box<dyn OcrBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    /// Set the field parser.
    pub fn with_parser(mut self, parser: CardParser) -> Self {
        self.parser = parser;
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> CardPipeline {
        CardPipeline {
            backends: self.backends,
            parser: self.parser,
        }
    }
}

impl Default for CardPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CardPipeline {
    /// Create a new builder.
    pub fn builder() -> CardPipelineBuilder {
        CardPipelineBuilder::new()
    }

    /// Create a pipeline with every compiled-in backend, in priority order:
    /// Google Vision, ONNX PaddleOCR, Tesseract.
    pub fn from_config(config: &CinConfig) -> Self {
        #[allow(unused_mut)]
        let mut builder = Self::builder().with_parser(CardParser::from_config(&config.extraction));

        #[cfg(feature = "google-vision")]
        {
            builder = builder.with_backend(Box::new(crate::ocr::GoogleVisionBackend::new(
                config.ocr.google_vision.clone(),
            )));
        }

        #[cfg(feature = "onnx")]
        {
            builder = builder.with_backend(Box::new(crate::ocr::PureOcrBackend::new(
                config.ocr.onnx.clone(),
            )));
        }

        #[cfg(feature = "tesseract")]
        {
            builder = builder.with_backend(Box::new(crate::ocr::TesseractBackend::new(
                config.ocr.tesseract.clone(),
            )));
        }

        builder.build()
    }

    /// Names of the configured backends, in priority order.
    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// The backend that would serve the next request, if any.
    pub fn select_backend(&self) -> Option<&dyn OcrBackend> {
        self.backends
            .iter()
            .find(|b| {
                let available = b.is_available();
                debug!("Backend {}: available = {}", b.name(), available);
                available
            })
            .map(|b| b.as_ref())
    }

    /// Process a card image.
    pub fn process(&self, image: &DynamicImage) -> CardRecord {
        let start = Instant::now();

        match self.try_process(image) {
            Ok(Some(record)) => {
                info!("Card processed in {}ms", start.elapsed().as_millis());
                record
            }
            Ok(None) => {
                warn!("No OCR backend available, returning default record");
                CardRecord::fallback()
            }
            Err(e) => {
                warn!("OCR processing error: {}", e);
                CardRecord::fallback()
            }
        }
    }

    /// Process a card image, surfacing errors. `Ok(None)` means no backend
    /// was available.
    pub fn try_process(&self, image: &DynamicImage) -> Result<Option<CardRecord>, CinError> {
        let Some(backend) = self.select_backend() else {
            return Ok(None);
        };

        let (width, height) = image.dimensions();
        info!("Running {} on {}x{} image", backend.name(), width, height);

        let raw = backend.recognize(image)?;

        let record = self.parser.extract(&raw)?;
        debug!("Extracted fields: {:?}", record.populated_fields());

        Ok(Some(record))
    }

    /// Decode image bytes and process them.
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<CardRecord, CinError> {
        let image = image::load_from_memory(bytes)?;
        Ok(self.process(&image))
    }
}
