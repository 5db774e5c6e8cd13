//! # API Errors
//!
//! [`AppError`] is the single error type returned by handlers and services.
//! It renders as `{"error": {"code", "message", "details"?}}`; the auth and
//! rate-limit middleware produce the same envelope. Internal failures are
//! logged with their cause and answered with a fixed message.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::services::report::ReportError;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// JSON envelope for every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Stable code such as `NOT_FOUND` or `RATE_LIMITED`.
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.to_owned(),
                message: message.into(),
                details: None,
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown analysis, business, proof or user (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Input parsed but broke a field rule (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Unparsable input or a duplicate email (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing, unknown or expired session (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Storage, serialization or rendering failure (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The client-facing message, without the variant prefix of `Display`.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(m)
            | Self::Validation(m)
            | Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::Internal(m) => m,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Internal(cause) => {
                tracing::error!(%cause, "request failed");
                ErrorBody::new(self.code(), INTERNAL_MESSAGE)
            }
            _ => ErrorBody::new(self.code(), self.message()),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<astra_core::ValidationError> for AppError {
    fn from(err: astra_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<astra_core::CanonicalizationError> for AppError {
    fn from(err: astra_core::CanonicalizationError) -> Self {
        Self::Internal(format!("canonicalization failed: {err}"))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(format!("database error: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("record serialization failed: {err}"))
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        Self::Internal(format!("report rendering failed: {err}"))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("blocking task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn each_variant_maps_to_its_status_and_code() {
        let cases = [
            (AppError::NotFound("Analysis not found".into()), 404, "NOT_FOUND"),
            (AppError::Validation("budget".into()), 422, "VALIDATION_ERROR"),
            (AppError::BadRequest("Email already registered".into()), 400, "BAD_REQUEST"),
            (AppError::Unauthorized("expired".into()), 401, "UNAUTHORIZED"),
            (AppError::Internal("db".into()), 500, "INTERNAL_ERROR"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status().as_u16(), status, "{err}");
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn blocked_markup_becomes_validation_error() {
        let err: AppError = astra_core::ValidationError::ForbiddenContent("business_type").into();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("business_type")));
    }

    #[test]
    fn report_failure_is_internal() {
        let err: AppError = ReportError::Save("disk".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    async fn render(err: AppError) -> (StatusCode, axum::http::HeaderMap, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn internal_cause_is_not_returned() {
        let (status, _, body) = render(AppError::Internal("password=hunter2".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.message, INTERNAL_MESSAGE);
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn not_found_message_is_returned() {
        let (_, _, body) = render(AppError::NotFound("Analysis not found".into())).await;
        assert_eq!(body.error.code, "NOT_FOUND");
        assert_eq!(body.error.message, "Analysis not found");
    }

    #[tokio::test]
    async fn duplicate_email_message_has_no_prefix() {
        let (status, _, body) =
            render(AppError::BadRequest("Email already registered".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.message, "Email already registered");
    }

    #[tokio::test]
    async fn unauthorized_carries_bearer_challenge() {
        let (_, headers, _) = render(AppError::Unauthorized("expired".into())).await;
        assert_eq!(headers.get("www-authenticate").unwrap(), "Bearer");
    }
}
