//! Upload Gate Middleware

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::repository::RecordStore;
use crate::error::{UploadLimitError, UploadResult};
use crate::presentation::handlers::{UploadLimitState, caller};

/// Middleware that consumes one upload from the caller's quota
///
/// Rejected callers get the 429 response and the wrapped handler never
/// runs. Admitted responses carry the `X-RateLimit-*` headers.
pub async fn require_upload_quota<S>(
    State(state): State<UploadLimitState<S>>,
    req: Request<Body>,
    next: Next,
) -> UploadResult<Response>
where
    S: RecordStore + 'static,
{
    let (identity, tier) = caller(req.headers())?;

    let decision = state.limiter.check_and_consume(&identity, tier);
    if let Some(err) = UploadLimitError::from_decision(&decision) {
        return Err(err);
    }

    let mut response = next.run(req).await;
    decision.snapshot().apply_headers(response.headers_mut());
    Ok(response)
}
