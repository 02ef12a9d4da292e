use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::Multipart;
use axum::response::Response;
use tracing::{debug, warn};

use super::responses::ErrorResponse;
use crate::capture::CapturedImage;
use crate::detector::IMAGE_FIELD;

/// Reads the `image` field of a multipart upload.
///
/// `Ok(None)` means no usable frame: not a multipart body, no `image` field,
/// or an empty one. Other fields are skipped.
pub(super) async fn read_image_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Option<CapturedImage>, Response> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!("Request is not a multipart upload: {}", rejection);
            return Ok(None);
        }
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(err) => return Err(invalid_upload(err)),
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(invalid_upload)?;

        return Ok(
            CapturedImage::new(bytes.to_vec(), content_type.as_deref(), filename.as_deref()).ok(),
        );
    }
}

fn invalid_upload(err: MultipartError) -> Response {
    warn!("Failed to read upload: {}", err);
    let status = err.status();
    ErrorResponse::with_detail("invalid upload", err.body_text()).into_response_with(status)
}
