//! Configuration structures for the card OCR pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted when no Google Vision key is configured.
pub const GOOGLE_VISION_KEY_ENV: &str = "GOOGLE_VISION_API_KEY";

/// Main configuration for the cin pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CinConfig {
    /// OCR backend configuration.
    pub ocr: OcrConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// HTTP server configuration.
    pub server: ServerConfig,
}

/// OCR backend configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Google Cloud Vision settings.
    pub google_vision: GoogleVisionConfig,

    /// ONNX PaddleOCR settings.
    pub onnx: OnnxConfig,

    /// Tesseract settings.
    pub tesseract: TesseractConfig,
}

/// Google Cloud Vision REST backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleVisionConfig {
    /// Use this backend when a key is available.
    pub enabled: bool,

    /// API key. Falls back to `GOOGLE_VISION_API_KEY` when unset.
    pub api_key: Option<String>,

    /// Annotate endpoint.
    pub endpoint: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GoogleVisionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            timeout_secs: 30,
        }
    }
}

impl GoogleVisionConfig {
    /// Configured key, or the one from the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(GOOGLE_VISION_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// ONNX PaddleOCR backend (pure Rust inference).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OnnxConfig {
    /// Use this backend when its model files exist.
    pub enabled: bool,

    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text instead of blanking them.
    pub keep_unk: bool,
}

impl Default for OnnxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

impl OnnxConfig {
    pub fn detection_path(&self) -> PathBuf {
        self.model_dir.join(&self.detection_model)
    }

    pub fn recognition_path(&self) -> PathBuf {
        self.model_dir.join(&self.recognition_model)
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.model_dir.join(&self.dictionary)
    }
}

/// Tesseract (libtesseract) backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractConfig {
    /// Use this backend when the engine initializes.
    pub enabled: bool,

    /// Directory holding the `.traineddata` files. `None` uses the
    /// library default (`TESSDATA_PREFIX` or the install location).
    pub tessdata_dir: Option<PathBuf>,

    /// Languages, one pass each. French and Arabic for the printed fields,
    /// English for the MRZ.
    pub languages: Vec<String>,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tessdata_dir: None,
            languages: vec!["fra".to_string(), "ara".to_string(), "eng".to_string()],
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Merge fields decoded from the MRZ into the record.
    pub parse_mrz: bool,

    /// Run the per-fragment keyword pass on positional OCR output.
    pub fragment_keywords: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            parse_mrz: true,
            fragment_keywords: true,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Maximum upload size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl CinConfig {
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
}
