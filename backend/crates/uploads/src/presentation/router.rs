//! Upload Gate Router

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};

use crate::application::limiter::UploadRateLimiter;
use crate::domain::repository::RecordStore;
use crate::presentation::handlers::{self, UploadLimitState};
use crate::presentation::middleware::require_upload_quota;

/// Caller-facing quota routes (`/check`, `/status`)
pub fn upload_limit_router<S>(limiter: Arc<UploadRateLimiter<S>>) -> Router
where
    S: RecordStore + 'static,
{
    let state = UploadLimitState { limiter };

    Router::new()
        .route("/check", post(handlers::check_quota::<S>))
        .route("/status", get(handlers::quota_status::<S>))
        .with_state(state)
}

/// Administrative reset route
///
/// Not authenticated here; mount it only behind an admin-only boundary.
pub fn upload_limit_admin_router<S>(limiter: Arc<UploadRateLimiter<S>>) -> Router
where
    S: RecordStore + 'static,
{
    let state = UploadLimitState { limiter };

    Router::new()
        .route("/{identity}", delete(handlers::reset_quota::<S>))
        .with_state(state)
}

/// Gate every route of `router` behind the caller's upload quota
pub fn with_upload_gate<S>(router: Router, limiter: Arc<UploadRateLimiter<S>>) -> Router
where
    S: RecordStore + 'static,
{
    let state = UploadLimitState { limiter };
    router.route_layer(from_fn_with_state(state, require_upload_quota::<S>))
}
