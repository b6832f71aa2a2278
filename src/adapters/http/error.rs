//! Mapping of domain errors onto HTTP responses.

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Serialize;
use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Body of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalError, "An internal error occurred")
    }
}

/// Full error body, kept on the response for the verbose-errors layer.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub ErrorResponse);

/// API error wrapping a domain error.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        status_for(self.0.code)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        ApiError(error)
    }
}

/// HTTP status for each error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed
        | ErrorCode::EmptyField
        | ErrorCode::OutOfRange
        | ErrorCode::InvalidFormat
        | ErrorCode::InvalidConfiguration => StatusCode::BAD_REQUEST,
        ErrorCode::ChatSessionNotFound
        | ErrorCode::StageRunNotFound
        | ErrorCode::RecordingSessionNotFound
        | ErrorCode::ProjectNotFound => StatusCode::NOT_FOUND,
        ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let DomainError { code, message, details } = self.0;

        let mut detailed = ErrorResponse::new(code, message);
        if !details.is_empty() {
            detailed.details = serde_json::to_value(details).ok();
        }

        let public = if status.is_server_error() {
            tracing::error!(code = %detailed.code, message = %detailed.message, "Internal error");
            ErrorResponse::internal()
        } else {
            ErrorResponse {
                details: None,
                ..detailed.clone()
            }
        };

        let mut response = (status, Json(public)).into_response();
        response.extensions_mut().insert(ErrorDetail(detailed));
        response
    }
}

/// Response mapper that swaps error bodies for their full detail.
///
/// Mounted only when verbose errors are enabled.
pub async fn expose_error_details(mut response: Response) -> Response {
    match response.extensions_mut().remove::<ErrorDetail>() {
        Some(ErrorDetail(detail)) => (response.status(), Json(detail)).into_response(),
        None => response,
    }
}

/// Parses an id taken from the path.
pub fn parse_id<T: FromStr>(raw: &str, field: &str) -> Result<T, ApiError> {
    raw.parse().map_err(|_| {
        ApiError(DomainError::validation(
            field,
            format!("Invalid {} format: {}", field, raw),
        ))
    })
}
