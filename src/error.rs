//! Tally error types with HTTP status code mapping.
//!
//! [`TallyError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and the `{ success, message }` JSON
//! envelope that every endpoint answers with.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON failure body.
///
/// All failing responses follow this shape:
/// ```json
/// { "success": false, "message": "Invalid country code" }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable, non-leaking message.
    pub message: String,
}

/// Client-correctable validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInputKind {
    /// `country_code`, `country_name` or `session_id` was missing or empty.
    MissingFields,
    /// `country_code` is not exactly two uppercase ASCII letters.
    InvalidCountryCode,
    /// `display_name` exceeds the maximum length.
    DisplayNameTooLong,
    /// The request body is not a JSON object of the expected shape.
    MalformedBody,
}

impl InvalidInputKind {
    /// Message surfaced to the client.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingFields => "Missing required fields",
            Self::InvalidCountryCode => "Invalid country code",
            Self::DisplayNameTooLong => "Display name too long (max 24 characters)",
            Self::MalformedBody => "Invalid request body",
        }
    }
}

/// Service-side error enum with HTTP status code mapping.
///
/// | Variant              | HTTP Status                 |
/// |----------------------|-----------------------------|
/// | `InvalidInput`       | 400 Bad Request             |
/// | `RateLimited`        | 429 Too Many Requests       |
/// | `ServiceUnavailable` | 503 Service Unavailable     |
/// | `PersistenceError`   | 500 Internal Server Error   |
/// | `QueryFailed`        | 500 Internal Server Error   |
/// | `Internal`           | 500 Internal Server Error   |
#[derive(Debug, thiserror::Error)]
pub enum TallyError {
    /// Request validation failed.
    #[error("invalid input: {}", .0.message())]
    InvalidInput(InvalidInputKind),

    /// The session submitted too recently.
    #[error("rate limited; retry after {retry_after_secs} s")]
    RateLimited {
        /// Whole seconds until the session may submit again.
        retry_after_secs: u64,
    },

    /// The backing store is unconfigured or unreachable.
    #[error("storage unavailable")]
    ServiceUnavailable,

    /// Writing a submission failed.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Reading the aggregate failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Unexpected failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TallyError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::PersistenceError(_) | Self::QueryFailed(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the message shown to clients.
    ///
    /// Storage and internal variants never expose their inner detail.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidInput(kind) => kind.message().to_string(),
            Self::RateLimited { retry_after_secs } => {
                format!("Please wait {retry_after_secs} seconds before submitting again")
            }
            Self::ServiceUnavailable => "Storage unavailable".to_string(),
            Self::PersistenceError(_) => "Failed to save submission".to_string(),
            Self::QueryFailed(_) => "Failed to fetch stats".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Logs storage-side detail at the API boundary.
    pub fn log(&self) {
        match self {
            Self::PersistenceError(detail) => tracing::error!(%detail, "submission insert failed"),
            Self::QueryFailed(detail) => tracing::error!(%detail, "aggregate query failed"),
            Self::Internal(detail) => tracing::error!(%detail, "internal error"),
            Self::ServiceUnavailable => tracing::warn!("request rejected: store unavailable"),
            Self::InvalidInput(_) | Self::RateLimited { .. } => {}
        }
    }
}

impl IntoResponse for TallyError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let body = ErrorResponse {
            success: false,
            message: self.public_message(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        if let Self::RateLimited { retry_after_secs } = self
            && let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string())
        {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        response
    }
}
