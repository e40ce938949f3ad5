//! Upload Rate Limiter
//!
//! Gates attachment uploads per user and plan tier with a fixed window that
//! starts at each user's first upload (not aligned to the wall clock).
//!
//! State lives in this process only. Horizontally scaled deployments give
//! every instance its own independent counters.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use platform::clock::{Clock, SystemClock};

use crate::application::config::UploadLimitConfig;
use crate::domain::repository::RecordStore;
use crate::domain::services;
use crate::domain::value_objects::{Decision, Identity, PlanTier, QuotaStatus};
use crate::error::UploadResult;
use crate::infra::memory::InMemoryRecordStore;

/// Per-user upload rate limiter
///
/// Every operation is synchronous and holds the store lock for its whole
/// read-check-write sequence, so concurrent uploads from one user can never
/// push `count` past the tier limit.
pub struct UploadRateLimiter<S = InMemoryRecordStore>
where
    S: RecordStore,
{
    store: Mutex<S>,
    config: Arc<UploadLimitConfig>,
    clock: Arc<dyn Clock>,
}

impl UploadRateLimiter<InMemoryRecordStore> {
    /// In-memory limiter on the wall clock
    pub fn new(config: UploadLimitConfig) -> UploadResult<Self> {
        Self::with_store(InMemoryRecordStore::new(), config, Arc::new(SystemClock))
    }
}

impl<S> UploadRateLimiter<S>
where
    S: RecordStore,
{
    pub fn with_store(
        store: S,
        config: UploadLimitConfig,
        clock: Arc<dyn Clock>,
    ) -> UploadResult<Self> {
        config.validate()?;
        Ok(Self {
            store: Mutex::new(store),
            config: Arc::new(config),
            clock,
        })
    }

    pub fn config(&self) -> &UploadLimitConfig {
        &self.config
    }

    /// Admit or reject one upload attempt, consuming quota when admitted
    pub fn check_and_consume(&self, identity: &Identity, tier: PlanTier) -> Decision {
        let rate_limit = self.config.rate_limit_for(tier);
        let now_ms = self.clock.now_ms();

        let mut store = self.lock();
        let current = store.get(identity);
        let (decision, updated) = services::decide(current.as_ref(), &rate_limit, now_ms);
        if let Some(record) = updated {
            store.set(identity, record);
        }
        drop(store);

        if decision.allowed() {
            tracing::debug!(
                identity = %identity,
                plan_tier = %tier,
                limit = decision.limit(),
                remaining = decision.remaining(),
                "Upload admitted"
            );
        } else {
            tracing::warn!(
                event = "attachment_rate_limited",
                user_id = %identity,
                plan_tier = %tier,
                limit = decision.limit(),
                reset_in_ms = decision.reset_in_ms(),
                "Upload rate limit exceeded"
            );
        }

        decision
    }

    /// Current usage for display; never creates or rolls over a window
    pub fn peek_status(&self, identity: &Identity, tier: PlanTier) -> QuotaStatus {
        let limit = self.config.uploads_per_window(tier);
        let now_ms = self.clock.now_ms();
        let current = self.lock().get(identity);
        services::status(current.as_ref(), limit, now_ms)
    }

    /// Drop the identity's record regardless of window state
    pub fn reset(&self, identity: &Identity) {
        if self.lock().delete(identity) {
            tracing::info!(identity = %identity, "Upload rate limit reset");
        }
    }

    /// Drop every record whose window has closed
    ///
    /// Returns the number of records removed.
    pub fn cleanup_expired(&self) -> usize {
        let now_ms = self.clock.now_ms();
        let removed = self.lock().sweep_expired(now_ms);
        if removed > 0 {
            tracing::info!(removed = removed, "Cleaned up expired upload rate limits");
        }
        removed
    }

    /// Number of identities currently holding a record
    pub fn tracked_identities(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, S> {
        // Store operations cannot leave a record half-written
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
