// Error types for the API server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

const MIB: usize = 1024 * 1024;
const KIB: usize = 1024;

/// Every way a background removal request can fail.
/// Each variant maps to one status code and one client-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    NoImageProvided,
    NoImageSelected,
    PayloadTooLarge { limit_bytes: usize },
    ProcessingFailed,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoImageProvided | Self::NoImageSelected => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ProcessingFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::NoImageProvided => "No image file provided".to_string(),
            Self::NoImageSelected => "No image file selected".to_string(),
            Self::PayloadTooLarge { limit_bytes } => format!(
                "File too large. Maximum size is {}.",
                describe_size(*limit_bytes)
            ),
            Self::ProcessingFailed => "Failed to process image".to_string(),
        }
    }
}

fn describe_size(bytes: usize) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message(),
        });
        (self.status(), body).into_response()
    }
}
