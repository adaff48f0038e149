//! PaddleOCR backend using `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).

use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use pure_onnx_ocr::engine::{OcrEngine, OcrEngineBuilder};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OnnxConfig;

use super::{sort_by_reading_order, OcrBackend, RawText, TextFragment};

/// OCR backend returning positioned fragments.
///
/// The engine is loaded on first use and kept for later calls. A failed load
/// is not cached.
pub struct PureOcrBackend {
    config: OnnxConfig,
    engine: OnceLock<Mutex<OcrEngine>>,
}

impl PureOcrBackend {
    pub fn new(config: OnnxConfig) -> Self {
        Self {
            config,
            engine: OnceLock::new(),
        }
    }

    fn engine(&self) -> Result<&Mutex<OcrEngine>, OcrError> {
        if let Some(engine) = self.engine.get() {
            return Ok(engine);
        }

        let engine = OcrEngineBuilder::new()
            .det_model_path(&self.config.detection_path())
            .rec_model_path(&self.config.recognition_path())
            .dictionary_path(&self.config.dictionary_path())
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        debug!("Loaded pure-onnx-ocr engine from {}", self.config.model_dir.display());
        Ok(self.engine.get_or_init(|| Mutex::new(engine)))
    }
}

impl OcrBackend for PureOcrBackend {
    fn name(&self) -> &str {
        "onnx"
    }

    fn is_available(&self) -> bool {
        self.config.enabled
            && self.config.detection_path().exists()
            && self.config.recognition_path().exists()
            && self.config.dictionary_path().exists()
    }

    fn recognize(&self, image: &DynamicImage) -> Result<RawText, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        info!("Processing image: {}x{}", width, height);

        let engine = self
            .engine()?
            .lock()
            .map_err(|_| OcrError::Recognition("pure-onnx-ocr engine lock poisoned".to_string()))?;
        let results = engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut fragments: Vec<TextFragment> = results
            .iter()
            .map(|r| TextFragment {
                text: if self.config.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                },
                confidence: r.confidence,
                bbox: polygon_to_bbox(&r.bounding_box),
            })
            .collect();

        sort_by_reading_order(&mut fragments);

        info!(
            "OCR complete: {} fragments in {}ms",
            fragments.len(),
            start.elapsed().as_millis()
        );

        Ok(RawText::Fragments(fragments))
    }
}

/// Convert a `Polygon<f64>` to our `[f32; 8]` bbox format.
///
/// Extracts the first 4 exterior points (quadrilateral) as
/// `[x1, y1, x2, y2, x3, y3, x4, y4]`.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}
