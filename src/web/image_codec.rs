use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

use super::OUTPUT_FILENAME;
use crate::remover::RemovalError;

/// Checks that `data` is a PNG whose header decodes, returning its dimensions.
pub fn verify_png(data: &[u8]) -> Result<(u32, u32), RemovalError> {
    match image::guess_format(data) {
        Ok(ImageFormat::Png) => {}
        Ok(other) => {
            return Err(RemovalError::InvalidOutput(format!(
                "expected PNG, got {:?}",
                other
            )));
        }
        Err(e) => return Err(RemovalError::InvalidOutput(e.to_string())),
    }

    ImageReader::with_format(Cursor::new(data), ImageFormat::Png)
        .into_dimensions()
        .map_err(|e| RemovalError::InvalidOutput(e.to_string()))
}

/// Wraps processed PNG bytes as an inline download.
pub fn png_response(data: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, mime::IMAGE_PNG.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", OUTPUT_FILENAME),
            ),
        ],
        data,
    )
        .into_response()
}
