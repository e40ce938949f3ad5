//! Application Configuration
//!
//! Configuration for the upload rate limiter.

use std::time::Duration;

use platform::rate_limit::RateLimitConfig;

use crate::domain::value_objects::PlanTier;
use crate::error::{UploadLimitError, UploadResult};

/// Window shared by every tier. User-facing messages say "per minute".
pub const UPLOAD_WINDOW: Duration = Duration::from_secs(60);

/// Upload limiter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimitConfig {
    /// Uploads per window on the free plan
    pub free_uploads_per_window: u32,
    /// Uploads per window on the pro plan
    pub pro_uploads_per_window: u32,
    /// Uploads per window on the business plan
    pub business_uploads_per_window: u32,
    /// How often the background sweep drops expired records
    pub cleanup_interval: Duration,
}

impl Default for UploadLimitConfig {
    fn default() -> Self {
        Self {
            free_uploads_per_window: 15,
            pro_uploads_per_window: 60,
            business_uploads_per_window: 60,
            cleanup_interval: Duration::from_secs(300),
        }
    }
}

impl UploadLimitConfig {
    /// Create config for development (sweeps every minute)
    pub fn development() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(60),
            ..Self::default()
        }
    }

    pub fn uploads_per_window(&self, tier: PlanTier) -> u32 {
        match tier {
            PlanTier::Free => self.free_uploads_per_window,
            PlanTier::Pro => self.pro_uploads_per_window,
            PlanTier::Business => self.business_uploads_per_window,
        }
    }

    pub fn rate_limit_for(&self, tier: PlanTier) -> RateLimitConfig {
        RateLimitConfig::new(self.uploads_per_window(tier), UPLOAD_WINDOW)
    }

    /// Reject tables that would admit nothing or never sweep
    pub fn validate(&self) -> UploadResult<()> {
        for tier in [PlanTier::Free, PlanTier::Pro, PlanTier::Business] {
            if self.uploads_per_window(tier) == 0 {
                return Err(UploadLimitError::InvalidConfig(format!(
                    "{tier} tier must allow at least one upload per window"
                )));
            }
        }
        if self.cleanup_interval.is_zero() {
            return Err(UploadLimitError::InvalidConfig(
                "cleanup interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
