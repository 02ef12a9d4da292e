use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub(super) const NO_FILE_UPLOADED: &str = "no file uploaded";
pub(super) const MISSING_EMOTION: &str = "missing emotion";

/// JSON error body shared by the API routes.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    pub fn with_detail(error: impl Into<String>, detail: impl ToString) -> Self {
        Self {
            error: error.into(),
            detail: Some(detail.to_string()),
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

pub(super) fn no_file_uploaded() -> Response {
    ErrorResponse::new(NO_FILE_UPLOADED).into_response_with(StatusCode::BAD_REQUEST)
}
