// Model-independent image steps: decoding, mask post-processing,
// alpha compositing and PNG encoding.

use super::RemovalError;
use image::{DynamicImage, GrayImage, ImageFormat, RgbaImage, imageops::FilterType};
use std::io::Cursor;

pub fn decode(input: &[u8]) -> Result<DynamicImage, RemovalError> {
    image::load_from_memory(input).map_err(RemovalError::Decode)
}

/// Converts a raw saliency prediction into an 8-bit mask using min-max scaling.
///
/// A flat prediction carries no contrast to stretch, so its values are
/// clamped to [0, 1] as-is.
pub fn mask_from_prediction(
    prediction: &[f32],
    width: u32,
    height: u32,
) -> Result<GrayImage, RemovalError> {
    let expected = width as usize * height as usize;
    if prediction.len() < expected {
        return Err(RemovalError::Inference(format!(
            "prediction has {} values, expected at least {} ({}x{})",
            prediction.len(),
            expected,
            width,
            height
        )));
    }
    let prediction = &prediction[..expected];

    let (min, max) = prediction
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    let pixels = prediction
        .iter()
        .map(|&v| {
            let scaled = if range > f32::EPSILON {
                (v - min) / range
            } else {
                v
            };
            (scaled.clamp(0.0, 1.0) * 255.0).round() as u8
        })
        .collect();

    GrayImage::from_raw(width, height, pixels).ok_or_else(|| {
        RemovalError::Inference(format!("could not build {}x{} mask", width, height))
    })
}

pub fn resize_mask(mask: &GrayImage, width: u32, height: u32) -> GrayImage {
    if mask.dimensions() == (width, height) {
        return mask.clone();
    }
    image::imageops::resize(mask, width, height, FilterType::Lanczos3)
}

/// Keeps the source colours and multiplies the source alpha by the mask.
pub fn apply_mask(image: &DynamicImage, mask: &GrayImage) -> RgbaImage {
    let mut rgba = image.to_rgba8();
    for (x, y, pixel) in rgba.enumerate_pixels_mut() {
        let coverage = mask.get_pixel_checked(x, y).map_or(0, |m| m[0]);
        pixel[3] = ((u16::from(pixel[3]) * u16::from(coverage) + 127) / 255) as u8;
    }
    rgba
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RemovalError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(RemovalError::Encode)?;
    Ok(buffer.into_inner())
}
