//! OCR backends producing raw text from card images.

#[cfg(feature = "google-vision")]
mod google_vision;
#[cfg(feature = "onnx")]
mod pure_engine;
#[cfg(feature = "tesseract")]
mod tesseract;

#[cfg(feature = "google-vision")]
pub use google_vision::GoogleVisionBackend;
#[cfg(feature = "onnx")]
pub use pure_engine::PureOcrBackend;
#[cfg(feature = "tesseract")]
pub use tesseract::TesseractBackend;

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// A recognized text fragment with its position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextFragment {
    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,

    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],
}

impl TextFragment {
    /// Get the axis-aligned bounding rectangle.
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

/// Text produced by an OCR backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RawText {
    /// A single block of text.
    Plain(String),
    /// Positioned fragments, in reading order.
    Fragments(Vec<TextFragment>),
}

impl RawText {
    /// All text as one string. Fragments are joined with a single space.
    pub fn full_text(&self) -> String {
        match self {
            RawText::Plain(text) => text.clone(),
            RawText::Fragments(fragments) => fragments
                .iter()
                .map(|f| f.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Fragments, if the backend produced positions.
    pub fn fragments(&self) -> Option<&[TextFragment]> {
        match self {
            RawText::Plain(_) => None,
            RawText::Fragments(fragments) => Some(fragments),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            RawText::Plain(text) => text.trim().is_empty(),
            RawText::Fragments(fragments) => fragments.iter().all(|f| f.text.trim().is_empty()),
        }
    }
}

/// An OCR engine that turns an image into text.
///
/// Backends hold configuration only; each call to [`OcrBackend::recognize`]
/// is independent.
pub trait OcrBackend: Send + Sync {
    /// Short identifier used in logs ("google-vision", "onnx", "tesseract").
    fn name(&self) -> &str;

    /// Whether the backend can run in the current environment.
    fn is_available(&self) -> bool;

    /// Recognize the text on an image.
    fn recognize(&self, image: &DynamicImage) -> Result<RawText, OcrError>;
}

/// Sort fragments by reading order (top-to-bottom, left-to-right).
pub fn sort_by_reading_order(fragments: &mut [TextFragment]) {
    fragments.sort_by(|a, b| {
        let (_, ay, _, _) = a.rect();
        let (_, by, _, _) = b.rect();

        // Group by approximate vertical position (within 20 pixels)
        let row_a = (ay / 20.0) as i32;
        let row_b = (by / 20.0) as i32;

        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            // Same row, sort by x
            let (ax, _, _, _) = a.rect();
            let (bx, _, _, _) = b.rect();
            ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
        }
    });
}

/// Encode an image as PNG bytes.
#[cfg_attr(not(any(feature = "google-vision", feature = "tesseract")), allow(dead_code))]
pub(crate) fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, OcrError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| OcrError::InvalidImage(format!("failed to encode PNG: {}", e)))?;
    Ok(bytes)
}
