//! Error types for the resolver middleware and extractors.
//!
//! The split matters to callers: `Unauthenticated` (401) means acquire or
//! refresh a token, while `Forbidden` (403) means the principal is valid but
//! the operation is out of its role's reach, so retrying with the same token
//! is pointless.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use warden_auth_core::AuthError;

/// Principal resolution errors.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Missing, invalid or expired credentials.
    #[error("authentication required")]
    Unauthenticated,

    /// Valid principal, wrong role for the operation.
    #[error("requires {required} role")]
    Forbidden { required: String },

    /// Internal failure during resolution.
    #[error("internal auth error: {0}")]
    Internal(String),
}

impl ResolveError {
    /// Create a forbidden error naming the required role.
    #[must_use]
    pub fn forbidden(required: impl Into<String>) -> Self {
        Self::Forbidden {
            required: required.into(),
        }
    }
}

impl From<AuthError> for ResolveError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(msg) | AuthError::Internal(msg) => Self::Internal(msg),
            // Every token-shaped failure collapses to 401 at this boundary
            _ => Self::Unauthenticated,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            Self::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "principal resolution failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = match &self {
            // Internal details stay out of responses
            Self::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };

        (status, Json(body)).into_response()
    }
}
