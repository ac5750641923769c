//! Error taxonomy for the credential lifecycle endpoints.

use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;
use tracing::error;

/// Handler-facing errors mapped to HTTP statuses at the boundary.
///
/// Validation failures carry a caller-visible message. Internal failures are
/// logged with full context where they occur and reach the caller as an
/// opaque 500.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Invalid credentials")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal server error")]
    Internal,
}

impl AuthError {
    /// Log a storage/notification failure and collapse it to an opaque 500.
    pub(super) fn internal(err: anyhow::Error) -> Self {
        error!("{err:#}");
        Self::Internal
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), self.to_string()).into_response()
    }
}
