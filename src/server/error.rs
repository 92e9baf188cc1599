//! JSON error bodies: `{"code": 404, "name": "Not Found", "description": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::announce::{AnnounceError, AnnounceErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub description: String,
}

#[derive(Serialize)]
struct ApiErrorBody<'a> {
    code: u16,
    name: &'a str,
    description: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, description: impl Into<String>) -> Self {
        Self {
            status,
            description: description.into(),
        }
    }

    pub fn forbidden() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "A valid token is required to upload an announce sound.",
        )
    }

    pub fn internal(description: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, description)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            code: self.status.as_u16(),
            name: self.status.canonical_reason().unwrap_or("Unknown"),
            description: &self.description,
        };
        (self.status, Json(body)).into_response()
    }
}

pub fn status_for(kind: AnnounceErrorKind) -> StatusCode {
    match kind {
        AnnounceErrorKind::NotFound => StatusCode::NOT_FOUND,
        AnnounceErrorKind::InvalidIdentifier => StatusCode::BAD_REQUEST,
        AnnounceErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        AnnounceErrorKind::UnsupportedType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        AnnounceErrorKind::InvalidAudio | AnnounceErrorKind::TooLong => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AnnounceErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<AnnounceError> for ApiError {
    fn from(err: AnnounceError) -> Self {
        let status = status_for(err.kind());
        match err {
            // Keep filesystem details out of the response.
            AnnounceError::Storage(io) => {
                error!("Storage failure: {}", io);
                ApiError::internal("Could not access announce sound storage.")
            }
            other => {
                if status != StatusCode::NOT_FOUND {
                    warn!("Rejected announce request: {}", other);
                }
                ApiError::new(status, other.to_string())
            }
        }
    }
}
