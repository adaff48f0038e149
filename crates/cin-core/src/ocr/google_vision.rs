//! Google Cloud Vision backend (REST `images:annotate`, TEXT_DETECTION).

use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::DynamicImage;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::GoogleVisionConfig;

use super::{encode_png, OcrBackend, RawText};

/// OCR backend calling the Google Cloud Vision API.
///
/// Returns the full-text annotation as plain text.
pub struct GoogleVisionBackend {
    config: GoogleVisionConfig,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    message: String,
}

impl GoogleVisionBackend {
    pub fn new(config: GoogleVisionConfig) -> Self {
        Self { config }
    }

    fn request_body(png: &[u8]) -> serde_json::Value {
        json!({
            "requests": [{
                "image": { "content": BASE64.encode(png) },
                "features": [{ "type": "TEXT_DETECTION" }]
            }]
        })
    }
}

/// Pull the full text out of an annotate response.
///
/// The first text annotation spans the whole image; an image without text
/// yields an empty string.
fn full_text(response: AnnotateResponse) -> Result<String, OcrError> {
    let Some(first) = response.responses.into_iter().next() else {
        return Err(OcrError::Request("empty annotate response".to_string()));
    };

    if let Some(status) = first.error {
        return Err(OcrError::Request(status.message));
    }

    Ok(first
        .text_annotations
        .into_iter()
        .next()
        .map(|a| a.description)
        .unwrap_or_default())
}

impl OcrBackend for GoogleVisionBackend {
    fn name(&self) -> &str {
        "google-vision"
    }

    fn is_available(&self) -> bool {
        self.config.enabled && self.config.resolve_api_key().is_some()
    }

    fn recognize(&self, image: &DynamicImage) -> Result<RawText, OcrError> {
        let start = Instant::now();

        let api_key = self
            .config
            .resolve_api_key()
            .ok_or_else(|| OcrError::Unavailable("no Google Vision API key".to_string()))?;

        let body = Self::request_body(&encode_png(image)?);

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()
            .map_err(|e| OcrError::Request(e.to_string()))?;

        debug!("Calling {}", self.config.endpoint);

        let response = client
            .post(&self.config.endpoint)
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| OcrError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| OcrError::Request(e.to_string()))?
            .json::<AnnotateResponse>()
            .map_err(|e| OcrError::Request(format!("invalid annotate response: {}", e)))?;

        let text = full_text(response)?;

        info!(
            "OCR complete: {} chars from Google Vision in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );

        Ok(RawText::Plain(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_takes_first_annotation() {
        let response: AnnotateResponse = serde_json::from_str(
            r#"{"responses": [{"textAnnotations": [
                {"description": "ROYAUME DU MAROC\nAB123456", "locale": "fr"},
                {"description": "ROYAUME"}
            ]}]}"#,
        )
        .unwrap();

        assert_eq!(full_text(response).unwrap(), "ROYAUME DU MAROC\nAB123456");
    }

    #[test]
    fn test_full_text_without_text() {
        let response: AnnotateResponse = serde_json::from_str(r#"{"responses": [{}]}"#).unwrap();
        assert_eq!(full_text(response).unwrap(), "");
    }

    #[test]
    fn test_full_text_error_status() {
        let response: AnnotateResponse = serde_json::from_str(
            r#"{"responses": [{"error": {"code": 3, "message": "Bad image data."}}]}"#,
        )
        .unwrap();

        let err = full_text(response).unwrap_err();
        assert_eq!(err.to_string(), "request failed: Bad image data.");
    }

    #[test]
    fn test_request_body_shape() {
        let body = GoogleVisionBackend::request_body(b"abc");
        assert_eq!(body["requests"][0]["image"]["content"], "YWJj");
        assert_eq!(body["requests"][0]["features"][0]["type"], "TEXT_DETECTION");
    }

    #[test]
    fn test_disabled_is_unavailable() {
        let backend = GoogleVisionBackend::new(GoogleVisionConfig {
            enabled: false,
            api_key: Some("key".to_string()),
            ..GoogleVisionConfig::default()
        });
        assert!(!backend.is_available());
    }
}
