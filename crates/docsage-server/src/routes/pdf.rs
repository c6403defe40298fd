//! PDF upload route: extracts text from a PDF sent with a chat message.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use crate::state::AppState;

/// Multipart field carrying the document.
const PDF_FIELD: &str = "pdf";
const PDF_CONTENT_TYPE: &str = "application/pdf";
const EXTRACTION_METHOD: &str = "pdf-extract";
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;
const PROCESSING_FAILED: &str = "Failed to process PDF file";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/process-pdf", post(process_pdf))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// POST /api/process-pdf: multipart field `pdf` to `{ text, method, pages }`.
async fn process_pdf(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut upload = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                error!("Malformed multipart upload: {}", e);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED);
            }
        };
        if field.name() != Some(PDF_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let filename = field.file_name().unwrap_or("upload.pdf").to_string();
        match field.bytes().await {
            Ok(bytes) => upload = Some((filename, content_type, bytes)),
            Err(e) => {
                error!("Failed to read PDF upload {}: {}", filename, e);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED);
            }
        }
        break;
    }

    let Some((filename, content_type, bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "No PDF file provided");
    };
    if content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
        return error_response(StatusCode::BAD_REQUEST, "File must be a PDF");
    }

    let extractor = Arc::clone(&state.extractor);
    let extracted = tokio::task::spawn_blocking(move || extractor.extract(&bytes)).await;

    match extracted {
        Ok(Ok(extracted)) if extracted.text.trim().is_empty() => {
            error_response(StatusCode::BAD_REQUEST, "No text found in PDF")
        }
        Ok(Ok(extracted)) => {
            info!(
                "Extracted {} chars from {} ({} pages)",
                extracted.text.len(),
                filename,
                extracted.page_count
            );
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "text": extracted.text,
                    "method": EXTRACTION_METHOD,
                    "pages": extracted.page_count,
                })),
            )
        }
        Ok(Err(e)) => {
            error!("PDF processing error for {}: {}", filename, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED)
        }
        Err(e) => {
            error!("PDF processing task failed for {}: {}", filename, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED)
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({ "error": message })))
}
