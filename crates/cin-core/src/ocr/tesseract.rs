//! Tesseract backend through the libtesseract bindings.

use std::time::Instant;

use image::DynamicImage;
use tesseract::Tesseract;
use tracing::{debug, info, warn};

use crate::error::OcrError;
use crate::models::config::TesseractConfig;

use super::{encode_png, OcrBackend, RawText};

/// OCR backend running one Tesseract pass per configured language.
///
/// The outputs of all passes are joined with newlines: the French pass reads
/// the labels, the Arabic pass the Arabic fields, the English pass the MRZ.
pub struct TesseractBackend {
    config: TesseractConfig,
}

impl TesseractBackend {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    fn init(&self, language: &str) -> Result<Tesseract, OcrError> {
        let datapath = match &self.config.tessdata_dir {
            Some(dir) => Some(dir.to_str().ok_or_else(|| {
                OcrError::ModelLoad(format!("invalid tessdata path: {}", dir.display()))
            })?),
            None => None,
        };

        Tesseract::new(datapath, Some(language))
            .map_err(|e| OcrError::ModelLoad(format!("tesseract ({}): {}", language, e)))
    }

    fn run_pass(&self, png: &[u8], language: &str) -> Result<String, OcrError> {
        let mut tess = self
            .init(language)?
            .set_image_from_mem(png)
            .map_err(|e| OcrError::InvalidImage(format!("tesseract: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| OcrError::Recognition(format!("tesseract ({}): {}", language, e)))?;

        debug!(
            "tesseract {}: {} chars, mean confidence {}",
            language,
            text.len(),
            tess.mean_text_conf()
        );

        Ok(text)
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        if !self.config.enabled || self.config.languages.is_empty() {
            return false;
        }

        match self.init(&self.config.languages.join("+")) {
            Ok(_) => true,
            Err(e) => {
                debug!("tesseract not usable: {}", e);
                false
            }
        }
    }

    fn recognize(&self, image: &DynamicImage) -> Result<RawText, OcrError> {
        let start = Instant::now();

        if self.config.languages.is_empty() {
            return Err(OcrError::Unavailable("no tesseract languages configured".to_string()));
        }

        let png = encode_png(image)?;

        let mut passes = Vec::with_capacity(self.config.languages.len());
        for language in &self.config.languages {
            let text = self.run_pass(&png, language)?;
            if text.trim().is_empty() {
                warn!("tesseract {} recognized no text", language);
            }
            passes.push(text);
        }

        info!(
            "OCR complete: {} tesseract passes in {}ms",
            passes.len(),
            start.elapsed().as_millis()
        );

        Ok(RawText::Plain(passes.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn missing_tessdata() -> TesseractConfig {
        TesseractConfig {
            tessdata_dir: Some(PathBuf::from("/nonexistent/cin-tessdata")),
            ..TesseractConfig::default()
        }
    }

    #[test]
    fn test_missing_tessdata_is_unavailable() {
        assert!(!TesseractBackend::new(missing_tessdata()).is_available());
    }

    #[test]
    fn test_disabled_is_unavailable() {
        let backend = TesseractBackend::new(TesseractConfig {
            enabled: false,
            ..TesseractConfig::default()
        });
        assert!(!backend.is_available());
    }

    #[test]
    fn test_no_languages() {
        let backend = TesseractBackend::new(TesseractConfig {
            languages: Vec::new(),
            ..TesseractConfig::default()
        });
        assert!(!backend.is_available());

        let err = backend.recognize(&DynamicImage::new_rgb8(8, 8)).unwrap_err();
        assert!(matches!(err, OcrError::Unavailable(_)));
    }

    #[test]
    fn test_missing_tessdata_fails_recognition() {
        let backend = TesseractBackend::new(missing_tessdata());
        let err = backend.recognize(&DynamicImage::new_rgb8(8, 8)).unwrap_err();
        assert!(matches!(err, OcrError::ModelLoad(_)));
    }
}
