//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use platform::client::{extract_plan_tier, extract_user_id};

use crate::application::limiter::UploadRateLimiter;
use crate::domain::repository::RecordStore;
use crate::domain::value_objects::{Identity, PlanTier};
use crate::error::{UploadLimitError, UploadResult};
use crate::presentation::dto::{CheckResponse, StatusResponse};

/// Shared state for upload gate handlers
pub struct UploadLimitState<S>
where
    S: RecordStore + 'static,
{
    pub limiter: Arc<UploadRateLimiter<S>>,
}

// Manual impl: cloning the state only clones the Arc, S itself need not be Clone
impl<S> Clone for UploadLimitState<S>
where
    S: RecordStore + 'static,
{
    fn clone(&self) -> Self {
        Self {
            limiter: Arc::clone(&self.limiter),
        }
    }
}

/// Resolve the caller's identity and plan tier from request headers
///
/// Missing identity header is 401, an empty one is 400. A missing or
/// unknown tier resolves to free.
pub fn caller(headers: &HeaderMap) -> UploadResult<(Identity, PlanTier)> {
    let raw = extract_user_id(headers)?;
    let identity = Identity::parse(&raw)?;
    let tier = PlanTier::resolve(extract_plan_tier(headers).as_deref());
    Ok((identity, tier))
}

/// POST /check
pub async fn check_quota<S>(
    State(state): State<UploadLimitState<S>>,
    headers: HeaderMap,
) -> UploadResult<Response>
where
    S: RecordStore + 'static,
{
    let (identity, tier) = caller(&headers)?;

    let decision = state.limiter.check_and_consume(&identity, tier);
    if let Some(err) = UploadLimitError::from_decision(&decision) {
        return Err(err);
    }

    let mut response = Json(CheckResponse::from(&decision)).into_response();
    decision.snapshot().apply_headers(response.headers_mut());
    Ok(response)
}

/// GET /status
pub async fn quota_status<S>(
    State(state): State<UploadLimitState<S>>,
    headers: HeaderMap,
) -> UploadResult<Json<StatusResponse>>
where
    S: RecordStore + 'static,
{
    let (identity, tier) = caller(&headers)?;
    let status = state.limiter.peek_status(&identity, tier);
    Ok(Json(status.into()))
}

/// DELETE /{identity}
pub async fn reset_quota<S>(
    State(state): State<UploadLimitState<S>>,
    Path(identity): Path<String>,
) -> UploadResult<StatusCode>
where
    S: RecordStore + 'static,
{
    let identity = Identity::parse(&identity)?;
    state.limiter.reset(&identity);
    Ok(StatusCode::NO_CONTENT)
}
