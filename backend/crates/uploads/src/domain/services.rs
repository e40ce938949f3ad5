//! Domain Services
//!
//! Pure admission logic. No clock, no storage: callers pass the current
//! record and time in and persist whatever comes back.

use platform::rate_limit::RateLimitConfig;

use crate::domain::entities::RateLimitRecord;
use crate::domain::value_objects::{Decision, QuotaStatus};

/// Decide one upload attempt
///
/// Returns the decision and, when usage changed, the record to store.
/// A rejection never produces a record.
pub fn decide(
    current: Option<&RateLimitRecord>,
    config: &RateLimitConfig,
    now_ms: i64,
) -> (Decision, Option<RateLimitRecord>) {
    let limit = config.max_requests;

    let active = current.filter(|record| !record.is_expired(now_ms));

    let Some(record) = active else {
        let fresh = RateLimitRecord::start(now_ms, config.window_ms());
        let decision = Decision::Admitted {
            limit,
            remaining: limit.saturating_sub(fresh.count),
            reset_in_ms: fresh.reset_in_ms(now_ms),
            reset_at_ms: fresh.window_reset_at_ms,
        };
        return (decision, Some(fresh));
    };

    if record.count >= limit {
        let decision = Decision::Rejected {
            limit,
            reset_in_ms: record.reset_in_ms(now_ms),
            reset_at_ms: record.window_reset_at_ms,
        };
        return (decision, None);
    }

    let updated = RateLimitRecord {
        count: record.count + 1,
        ..*record
    };
    let decision = Decision::Admitted {
        limit,
        remaining: limit.saturating_sub(updated.count),
        reset_in_ms: updated.reset_in_ms(now_ms),
        reset_at_ms: updated.window_reset_at_ms,
    };
    (decision, Some(updated))
}

/// Usage view of a record without touching it
pub fn status(current: Option<&RateLimitRecord>, limit: u32, now_ms: i64) -> QuotaStatus {
    match current.filter(|record| !record.is_expired(now_ms)) {
        Some(record) => QuotaStatus {
            count: record.count,
            limit,
            reset_in_ms: record.reset_in_ms(now_ms),
            percentage: percentage(record.count, limit),
        },
        None => QuotaStatus {
            count: 0,
            limit,
            reset_in_ms: 0,
            percentage: 0,
        },
    }
}

/// `count / limit` as a whole percentage, halves rounded up
pub fn percentage(count: u32, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let (count, limit) = (u64::from(count), u64::from(limit));
    let rounded = (count * 200 + limit) / (limit * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
