//! Routes that take an uploaded frame.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use super::responses::{no_file_uploaded, ErrorResponse};
use super::state::{GuardedAnalyzeGateway, GuardedScanPipeline};
use super::upload::read_image_field;
use crate::capture::UploadedFrame;
use crate::pipeline::{ScanError, ScanSession};

/// POST /analyze - Forward a frame to the detector and relay its answer
pub(super) async fn analyze(
    State(gateway): State<GuardedAnalyzeGateway>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let image = match read_image_field(multipart).await {
        Ok(Some(image)) => image,
        Ok(None) => return no_file_uploaded(),
        Err(response) => return response,
    };

    match gateway.forward(image).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => {
            warn!("Analysis failed: {}", err);
            ErrorResponse::with_detail("analysis_failed", &err)
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /scan - Run the whole pipeline on an uploaded frame
pub(super) async fn scan(
    State(pipeline): State<GuardedScanPipeline>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let frame = match read_image_field(multipart).await {
        Ok(frame) => UploadedFrame::new(frame),
        Err(response) => return response,
    };

    let session = ScanSession::new(pipeline);
    match session.scan(&frame).await {
        Ok(suggestion) => {
            info!(
                "Suggested {:?} for {} ({:?}/{:?})",
                suggestion.track().name,
                suggestion.emotion(),
                suggestion.emotion_source(),
                suggestion.track_source()
            );
            Json(suggestion).into_response()
        }
        Err(ScanError::Capture(err)) => {
            warn!("Scan aborted: {}", err);
            no_file_uploaded()
        }
        Err(ScanError::Busy) => {
            ErrorResponse::new("scan_in_progress").into_response_with(StatusCode::CONFLICT)
        }
    }
}
