// Background removal backends.
// The web layer only sees the `BackgroundRemover` trait; the model lives behind it.

pub mod cutout;
#[cfg(feature = "onnx")]
mod onnx;

#[cfg(feature = "onnx")]
pub use onnx::U2NetRemover;

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Failures raised while turning an uploaded image into a cut-out PNG.
#[derive(Debug, Error)]
pub enum RemovalError {
    #[error("failed to decode input image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode output image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("backend produced an invalid image: {0}")]
    InvalidOutput(String),

    #[error("background removal is unavailable: {0}")]
    Unavailable(String),
}

/// Takes encoded image bytes (PNG, JPEG, WebP, ...) and returns PNG bytes
/// with the background made transparent.
///
/// Implementations are called from a blocking thread and may take seconds.
pub trait BackgroundRemover: Send + Sync {
    fn remove(&self, input: &[u8]) -> Result<Vec<u8>, RemovalError>;
}

pub type SharedRemover = Arc<dyn BackgroundRemover>;

/// Used when the binary is built without an inference backend.
#[cfg_attr(feature = "onnx", allow(dead_code))]
#[derive(Debug, Default)]
pub struct UnavailableRemover;

impl BackgroundRemover for UnavailableRemover {
    fn remove(&self, _input: &[u8]) -> Result<Vec<u8>, RemovalError> {
        Err(RemovalError::Unavailable(
            "server was built without the `onnx` feature".to_string(),
        ))
    }
}

#[cfg(feature = "onnx")]
pub fn default_remover(model_path: PathBuf) -> SharedRemover {
    tracing::info!("Using U2-Net model at {}", model_path.display());
    if !model_path.is_file() {
        tracing::warn!(
            "Model file {} does not exist yet. Requests will fail until it is in place.",
            model_path.display()
        );
    }
    Arc::new(U2NetRemover::new(model_path))
}

#[cfg(not(feature = "onnx"))]
pub fn default_remover(model_path: PathBuf) -> SharedRemover {
    tracing::warn!(
        "Built without the `onnx` feature; ignoring model {} and rejecting all removal requests.",
        model_path.display()
    );
    Arc::new(UnavailableRemover)
}
