//! HTTP error responses.

use crate::error::ErrorKind;
use crate::persistence::RepositoryError;
use crate::provider::services::ProviderLifecycleError;
use crate::request::services::RequestLifecycleError;
use crate::validation::ValidationErrors;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// One violated input field in an error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Input field name.
    pub field: &'static str,
    /// Human-readable message naming the field.
    pub message: String,
}

/// JSON body of every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `"fail"`.
    pub status: String,
    /// Summary message.
    pub message: String,
    /// Per-field violations for validation failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// An error ready to be written as an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HttpError: message: {message}, status: {status}")]
pub struct HttpError {
    /// Message surfaced to the caller.
    pub message: String,
    /// Response status.
    pub status: StatusCode,
    /// Per-field violations, empty unless the input was invalid.
    pub errors: Vec<FieldError>,
}

impl HttpError {
    /// Creates an error with a message and status.
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status,
            errors: Vec::new(),
        }
    }

    /// 400 with a caller-supplied message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST)
    }

    /// 400 listing every violated field.
    #[must_use]
    pub fn validation(errors: &ValidationErrors) -> Self {
        Self {
            message: "validation failed".to_owned(),
            status: StatusCode::BAD_REQUEST,
            errors: errors
                .violations()
                .iter()
                .map(|violation| FieldError {
                    field: violation.field(),
                    message: violation.message(),
                })
                .collect(),
        }
    }

    /// The single 400 body returned for every rejected webhook submission.
    #[must_use]
    pub fn invalid_request() -> Self {
        Self::bad_request("invalid request")
    }

    /// 404 without detail.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new("resource not found", StatusCode::NOT_FOUND)
    }

    /// 503 for failures that may clear on retry.
    #[must_use]
    pub fn service_unavailable() -> Self {
        Self::new(
            "service temporarily unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
        )
    }

    /// 500 without detail.
    #[must_use]
    pub fn server_error() -> Self {
        Self::new("internal server error", StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Maps a classified failure onto a response. `detail` is only shown for
    /// user-facing kinds; fatal detail is logged and withheld.
    pub fn from_kind(kind: ErrorKind, detail: &dyn fmt::Display) -> Self {
        match kind {
            ErrorKind::Validation => Self::bad_request(detail.to_string()),
            ErrorKind::InvalidTransition => Self::new(detail.to_string(), StatusCode::CONFLICT),
            ErrorKind::ConcurrentModification => Self::new(
                "the record was modified concurrently; reload and retry",
                StatusCode::CONFLICT,
            ),
            ErrorKind::NotFound => Self::not_found(),
            ErrorKind::Transient => {
                tracing::warn!(error = %detail, "persistence unavailable");
                Self::service_unavailable()
            }
            ErrorKind::Fatal => {
                tracing::error!(error = %detail, "request failed");
                Self::server_error()
            }
        }
    }

    /// Writes the error as a JSON response.
    #[must_use]
    pub fn into_http_response(self) -> Response {
        let body = Json(ErrorResponse {
            status: "fail".to_owned(),
            message: self.message,
            errors: self.errors,
        });
        (self.status, body).into_response()
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

impl From<ValidationErrors> for HttpError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation(&errors)
    }
}

impl From<RepositoryError> for HttpError {
    fn from(err: RepositoryError) -> Self {
        Self::from_kind(err.kind(), &err)
    }
}

impl From<RequestLifecycleError> for HttpError {
    fn from(err: RequestLifecycleError) -> Self {
        match err {
            RequestLifecycleError::Validation(errors) => Self::validation(&errors),
            other => Self::from_kind(other.kind(), &other),
        }
    }
}

impl From<ProviderLifecycleError> for HttpError {
    fn from(err: ProviderLifecycleError) -> Self {
        match err {
            ProviderLifecycleError::Validation(errors) => Self::validation(&errors),
            ProviderLifecycleError::Repository(repository) => repository.into(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
