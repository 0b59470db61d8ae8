// Fakes and request builders shared by the router tests.

use super::{AppState, create_app};
use crate::remover::{BackgroundRemover, RemovalError, SharedRemover, cutout};
use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

pub const BOUNDARY: &str = "cutout-test-boundary";

/// Makes the left half of every image transparent, without a model.
pub struct HalfMaskRemover;

impl BackgroundRemover for HalfMaskRemover {
    fn remove(&self, input: &[u8]) -> Result<Vec<u8>, RemovalError> {
        let image = cutout::decode(input)?;
        let (width, height) = (image.width(), image.height());
        let mask = GrayImage::from_fn(width, height, |x, _| {
            Luma([if x < width / 2 { 0 } else { 255 }])
        });
        cutout::encode_png(&cutout::apply_mask(&image, &mask))
    }
}

/// Fails with an error whose text must never reach the client.
pub struct FailingRemover;

pub const SECRET_DETAIL: &str = "CUDA out of memory at 0xdeadbeef";

impl BackgroundRemover for FailingRemover {
    fn remove(&self, _input: &[u8]) -> Result<Vec<u8>, RemovalError> {
        Err(RemovalError::Inference(SECRET_DETAIL.to_string()))
    }
}

/// Returns bytes that are not a PNG.
pub struct GarbageRemover;

impl BackgroundRemover for GarbageRemover {
    fn remove(&self, _input: &[u8]) -> Result<Vec<u8>, RemovalError> {
        Ok(b"GIF89a definitely not png".to_vec())
    }
}

/// Panics inside the blocking task.
pub struct PanickingRemover;

impl BackgroundRemover for PanickingRemover {
    fn remove(&self, _input: &[u8]) -> Result<Vec<u8>, RemovalError> {
        panic!("remover blew up")
    }
}

pub fn app_with(remover: SharedRemover, max_upload_bytes: usize, dir: &Path) -> Router {
    let state = AppState {
        remover,
        max_upload_bytes,
        templates_dir: dir.join("templates"),
    };
    create_app(state, &dir.join("static"))
}

pub fn app(remover: impl BackgroundRemover + 'static, dir: &Path) -> Router {
    app_with(
        Arc::new(remover),
        crate::config::DEFAULT_MAX_UPLOAD_BYTES,
        dir,
    )
}

pub fn solid_image(width: u32, height: u32, color: [u8; 3], format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    RgbImage::from_pixel(width, height, Rgb(color))
        .write_to(&mut buffer, format)
        .unwrap();
    buffer.into_inner()
}

/// One multipart part: field name, optional filename, content.
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(name: &'a str, file_name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            file_name: Some(file_name),
            data,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file_name: None,
            data: value.as_bytes(),
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/remove-background")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn error_message(response: Response<Body>) -> String {
    let body = body_bytes(response).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json.as_object().unwrap().len(), 1, "unexpected body: {}", json);
    json["error"].as_str().unwrap().to_string()
}
