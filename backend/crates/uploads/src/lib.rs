//! Upload Gate Backend Module
//!
//! Per-user rate limiting of message attachment uploads.
//!
//! Clean Architecture structure:
//! - `domain/` - Records, value objects, the pure admission decision, store trait
//! - `application/` - Configuration and the limiter service
//! - `infra/` - In-memory store and the periodic cleanup task
//! - `presentation/` - HTTP handlers, middleware and router
//!
//! ## Limits
//! - free: 15 uploads per minute, pro and business: 60 uploads per minute
//! - Unknown or missing tiers are treated as free
//! - The window opens on each user's first upload, not on the minute boundary
//! - Counters are per process and lost on restart

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{UPLOAD_WINDOW, UploadLimitConfig};
pub use application::limiter::UploadRateLimiter;
pub use domain::value_objects::{Decision, Identity, PlanTier, QuotaStatus};
pub use error::{UploadLimitError, UploadResult};
pub use infra::cleanup::CleanupHandle;
pub use infra::memory::InMemoryRecordStore;
pub use presentation::router::{upload_limit_admin_router, upload_limit_router, with_upload_gate};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
