//! HTTP handlers.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use cin_core::CardRecord;

use super::AppState;

/// Upload-level failure, reported as HTTP 500 with a `detail` message.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": format!("Error processing image: {}", self.0) })),
        )
            .into_response()
    }
}

/// GET / - service metadata
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Morocco CIN OCR API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/extract": "POST - Extract CIN data from image"
        }
    }))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// POST /extract - extract card fields from an uploaded image
///
/// Expects a multipart form with the image in a `file` field. OCR failures
/// are not errors: they produce a record with only the side guessed.
pub async fn extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CardRecord>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        if !content_type.starts_with("image/") {
            warn!("Rejected upload with content type {:?}", content_type);
            return Err(ApiError(anyhow::anyhow!("File must be an image")));
        }

        let bytes = field.bytes().await?;
        debug!("Received {} bytes of {}", bytes.len(), content_type);
        upload = Some(bytes);
        break;
    }

    let bytes = upload.ok_or_else(|| ApiError(anyhow::anyhow!("No file uploaded")))?;

    let pipeline = state.pipeline.clone();
    let record = tokio::task::spawn_blocking(move || pipeline.process_bytes(&bytes)).await??;

    info!("Extracted {} fields", record.populated_fields().len());

    Ok(Json(record))
}
