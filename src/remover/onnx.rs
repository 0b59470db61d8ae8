// U2-Net salient object segmentation through ONNX Runtime.

use super::{BackgroundRemover, RemovalError, cutout};
use image::{DynamicImage, imageops::FilterType};
use ndarray::Array4;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Value;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, info, warn};

const INPUT_SIZE: u32 = 320;
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Removes backgrounds with a U2-Net model file.
///
/// The ONNX session is created on the first call and reused afterwards.
/// If creation fails the error is returned and the next call tries again.
pub struct U2NetRemover {
    model_path: PathBuf,
    // `Session::run` needs `&mut`, so concurrent requests take turns here.
    session: Mutex<Option<Session>>,
}

impl U2NetRemover {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            session: Mutex::new(None),
        }
    }

    fn load_session(&self) -> Result<Session, RemovalError> {
        let start = Instant::now();
        let session = Session::builder()
            .map_err(|e| RemovalError::ModelLoad(format!("Failed to create session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| RemovalError::ModelLoad(format!("Failed to set optimization level: {e}")))?
            .commit_from_file(&self.model_path)
            .map_err(|e| {
                RemovalError::ModelLoad(format!(
                    "Failed to load {}: {e}",
                    self.model_path.display()
                ))
            })?;

        info!(
            "Loaded model {} in {:.2}ms",
            self.model_path.display(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(session)
    }

    /// Runs the model and returns channel 0 of the first output with its width and height.
    fn predict(&self, input: Array4<f32>) -> Result<(Vec<f32>, u32, u32), RemovalError> {
        let mut guard = self.session.lock().unwrap_or_else(|poisoned| {
            // A panic mid-inference may leave the session unusable; reload it.
            warn!("Session lock poisoned by an earlier panic, reloading the model");
            self.session.clear_poison();
            let mut guard = poisoned.into_inner();
            *guard = None;
            guard
        });
        if guard.is_none() {
            *guard = Some(self.load_session()?);
        }
        let Some(session) = guard.as_mut() else {
            return Err(RemovalError::Inference("session not initialized".to_string()));
        };

        let input_value = Value::from_array(input)
            .map_err(|e| RemovalError::Inference(format!("Failed to convert input tensor: {e}")))?;

        let start = Instant::now();
        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(|e| RemovalError::Inference(format!("ONNX inference failed: {e}")))?;
        debug!(
            "Core inference: {:.2}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );

        let keys: Vec<_> = outputs.keys().collect();
        let first_key = keys
            .first()
            .ok_or_else(|| RemovalError::Inference("No output tensors found".to_string()))?;
        let output = outputs
            .get(first_key)
            .ok_or_else(|| RemovalError::Inference("First output tensor not found".to_string()))?
            .try_extract_array::<f32>()
            .map_err(|e| RemovalError::Inference(format!("Failed to extract output tensor: {e}")))?;

        let shape = output.shape();
        if shape.len() < 2 {
            return Err(RemovalError::Inference(format!(
                "Expected at least a 2D output tensor, got {}D",
                shape.len()
            )));
        }
        let height = shape[shape.len() - 2];
        let width = shape[shape.len() - 1];

        // Standard layout puts batch 0 / channel 0 first.
        let prediction: Vec<f32> = output.iter().take(width * height).copied().collect();

        Ok((prediction, width as u32, height as u32))
    }
}

/// Resizes to the model input, scales by the brightest sample and applies
/// ImageNet mean/std normalisation into an NCHW tensor.
fn preprocess(image: &DynamicImage) -> Array4<f32> {
    let resized = image
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Lanczos3)
        .to_rgb8();
    let max = f32::from(resized.as_raw().iter().copied().max().unwrap_or(0).max(1));

    let size = INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = (f32::from(pixel[c]) / max - MEAN[c]) / STD[c];
        }
    }
    tensor
}

impl BackgroundRemover for U2NetRemover {
    fn remove(&self, input: &[u8]) -> Result<Vec<u8>, RemovalError> {
        let image = cutout::decode(input)?;
        debug!("Decoded {}x{} input", image.width(), image.height());

        let (prediction, width, height) = self.predict(preprocess(&image))?;
        let mask = cutout::mask_from_prediction(&prediction, width, height)?;
        let mask = cutout::resize_mask(&mask, image.width(), image.height());

        cutout::encode_png(&cutout::apply_mask(&image, &mask))
    }
}
