use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::StatusCode,
};
use tracing::{debug, warn};

use super::{IMAGE_FIELD, error::ApiError};

// What the form held under the image field
enum ImagePart {
    Missing,
    Unselected,
    File(Bytes),
}

/// Pulls the uploaded image out of a `multipart/form-data` request.
///
/// The whole form is consumed so an oversized trailing part still trips
/// the body limit. Only parts that carry a filename count as files.
pub async fn extract_image_upload(request: Request, limit_bytes: usize) -> Result<Bytes, ApiError> {
    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!("Request is not a multipart form: {}", rejection);
            return Err(ApiError::NoImageProvided);
        }
    };

    let mut image_part = ImagePart::Missing;
    let mut ignored_fields = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_failure(e, limit_bytes))?
    {
        let file_name = match (field.name(), field.file_name()) {
            (Some(IMAGE_FIELD), Some(file_name)) => file_name.to_string(),
            _ => {
                debug!(
                    "Ignoring multipart field: {}",
                    field.name().unwrap_or("unnamed")
                );
                ignored_fields += 1;
                continue;
            }
        };

        if !matches!(image_part, ImagePart::Missing) {
            warn!("Multiple '{}' files found in multipart request, using the first one", IMAGE_FIELD);
            continue;
        }

        if file_name.is_empty() {
            image_part = ImagePart::Unselected;
            continue;
        }

        debug!(
            "Received '{}' with content type: {:?}",
            file_name,
            field.content_type()
        );
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_failure(e, limit_bytes))?;
        image_part = ImagePart::File(data);
    }

    if ignored_fields > 0 {
        debug!("Ignored {} fields in multipart request", ignored_fields);
    }

    match image_part {
        ImagePart::Missing => Err(ApiError::NoImageProvided),
        ImagePart::Unselected => Err(ApiError::NoImageSelected),
        ImagePart::File(data) => Ok(data),
    }
}

fn multipart_failure(err: MultipartError, limit_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        debug!("Request body exceeded {} bytes", limit_bytes);
        ApiError::PayloadTooLarge { limit_bytes }
    } else {
        warn!("Failed to read multipart request: {}", err);
        ApiError::NoImageProvided
    }
}
