// API handlers for the web server

use super::{
    AppState,
    error::ApiError,
    extract_request_data::extract_image_upload,
    image_codec::{png_response, verify_png},
};
use crate::remover::RemovalError;
use axum::{
    extract::{Request, State},
    response::Response,
};
use headers::{ContentLength, HeaderMapExt};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

// --- POST /remove-background ---
// Cuts the subject out of the uploaded `image` file and returns it as PNG
pub async fn remove_background(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();

    // Reject declared oversized bodies before reading any of them
    if let Some(ContentLength(declared)) = request.headers().typed_get::<ContentLength>() {
        if declared > state.max_upload_bytes as u64 {
            warn!(
                %request_id,
                "Rejecting upload: Content-Length {} exceeds limit of {} bytes",
                declared, state.max_upload_bytes
            );
            return Err(ApiError::PayloadTooLarge {
                limit_bytes: state.max_upload_bytes,
            });
        }
    }

    let upload = extract_image_upload(request, state.max_upload_bytes)
        .await
        .inspect_err(|e| debug!(%request_id, "Upload rejected: {}", e.message()))?;

    info!(%request_id, bytes = upload.len(), "Removing background");

    let remover = Arc::clone(&state.remover);
    let output = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, RemovalError> {
        let output = remover.remove(&upload)?;
        let (width, height) = verify_png(&output)?;
        debug!("Processed image: {}x{}, {} bytes", width, height, output.len());
        Ok(output)
    })
    .await
    .map_err(|e| {
        error!(%request_id, "Background removal task failed: {}", e);
        ApiError::ProcessingFailed
    })?
    .map_err(|e| {
        error!(%request_id, "Error processing image: {}", e);
        ApiError::ProcessingFailed
    })?;

    info!(%request_id, bytes = output.len(), "Background removed");

    Ok(png_response(output))
}
