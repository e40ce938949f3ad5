//! Caller identification utilities
//!
//! The authentication layer in front of this service resolves the session
//! and forwards the caller as plain headers. These helpers read them back.

use axum::http::HeaderMap;

/// Stable user ID of the authenticated caller
pub const USER_ID_HEADER: &str = "x-user-id";
/// Subscription tier of the caller (`free`, `pro`, `business`)
pub const PLAN_TIER_HEADER: &str = "x-plan-tier";

/// Error when extracting the caller from request headers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallerError {
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),
}

/// Extract the caller's user ID
///
/// The value is returned as sent; deciding whether an empty ID is acceptable
/// is left to the consumer.
///
/// ## Returns
/// * `Ok(String)` - Header present and valid UTF-8
/// * `Err(CallerError)` - Header missing or not representable as a string
pub fn extract_user_id(headers: &HeaderMap) -> Result<String, CallerError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or(CallerError::MissingHeader(USER_ID_HEADER))
}

/// Extract the caller's plan tier name, if the auth layer sent one
pub fn extract_plan_tier(headers: &HeaderMap) -> Option<String> {
    headers
        .get(PLAN_TIER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
