// Web server module
// Serves the upload page and the background removal endpoint

mod app;
mod error;
mod extract_request_data;
mod handlers;
mod image_codec;
mod listeners;
mod pages;
#[cfg(test)]
mod test_support;

pub use app::create_app;
pub use listeners::create_listener;

use crate::remover::SharedRemover;
use std::path::PathBuf;

// Name of the multipart field carrying the upload
pub const IMAGE_FIELD: &str = "image";

// Suggested filename for the processed image
pub const OUTPUT_FILENAME: &str = "background_removed.png";

/// Per-process context handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub remover: SharedRemover,
    pub max_upload_bytes: usize,
    pub templates_dir: PathBuf,
}
