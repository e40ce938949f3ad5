//! Upload Gate Error Types
//!
//! Upload-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::rate_limit::RateLimitSnapshot;
use thiserror::Error;

use crate::domain::value_objects::{Decision, rejection_message};

/// Upload-gate result type alias
pub type UploadResult<T> = Result<T, UploadLimitError>;

#[derive(Debug, Error)]
pub enum UploadLimitError {
    /// Caller sent an empty identity
    #[error("Identity must not be empty")]
    EmptyIdentity,

    /// Caller identity header missing
    #[error("Caller identity missing: {0}")]
    MissingIdentity(#[from] platform::client::CallerError),

    /// Upload quota exhausted for the current window
    #[error("Upload rate limit exceeded")]
    RateLimited(RateLimitSnapshot),

    /// Limiter configuration rejected at construction
    #[error("Invalid upload limit configuration: {0}")]
    InvalidConfig(String),
}

impl UploadLimitError {
    /// Build the rejection error from a limiter decision
    ///
    /// Returns `None` for admitted decisions.
    pub fn from_decision(decision: &Decision) -> Option<Self> {
        if decision.allowed() {
            None
        } else {
            Some(UploadLimitError::RateLimited(decision.snapshot()))
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadLimitError::EmptyIdentity => ErrorKind::BadRequest,
            UploadLimitError::MissingIdentity(_) => ErrorKind::Unauthorized,
            UploadLimitError::RateLimited(_) => ErrorKind::TooManyRequests,
            UploadLimitError::InvalidConfig(_) => ErrorKind::InternalServerError,
        }
    }

    fn log(&self) {
        if self.kind().is_server_error() {
            tracing::error!(error = %self, "Upload limiter misconfigured");
        } else if !matches!(self, UploadLimitError::RateLimited(_)) {
            // Rejections are already logged by the limiter with the caller attached
            tracing::debug!(error = %self, "Upload gate request refused");
        }
    }
}

impl From<UploadLimitError> for AppError {
    fn from(err: UploadLimitError) -> Self {
        match err {
            UploadLimitError::RateLimited(snapshot) => AppError::too_many_requests(
                rejection_message(snapshot.limit, snapshot.reset_in_ms),
            )
            .with_details(serde_json::json!({
                "remaining": snapshot.remaining,
                "resetIn": snapshot.reset_in_ms,
                "limit": snapshot.limit,
            })),
            UploadLimitError::EmptyIdentity => AppError::bad_request(err.to_string()),
            UploadLimitError::MissingIdentity(_) => AppError::unauthorized(err.to_string()),
            UploadLimitError::InvalidConfig(_) => {
                AppError::internal("Internal server error").with_source(err)
            }
        }
    }
}

impl IntoResponse for UploadLimitError {
    fn into_response(self) -> Response {
        self.log();
        let snapshot = match &self {
            UploadLimitError::RateLimited(snapshot) => Some(*snapshot),
            _ => None,
        };

        let mut response = AppError::from(self).into_response();
        if let Some(snapshot) = snapshot {
            snapshot.apply_rejection_headers(response.headers_mut());
        }
        response
    }
}
