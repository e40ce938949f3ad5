//! Domain Value Objects
//!
//! Immutable value types for the upload gate.

use std::fmt;

use platform::rate_limit::{RateLimitSnapshot, ceil_secs};
use serde::Serialize;

use crate::error::{UploadLimitError, UploadResult};

/// Key a rate limit bucket is scoped to, normally the authenticated user ID
///
/// Never empty: an empty key would silently put every anonymous caller in
/// one shared bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn parse(raw: &str) -> UploadResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UploadLimitError::EmptyIdentity);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Business,
}

impl PlanTier {
    /// Resolve a tier name as stored on the user's plan
    ///
    /// Missing or unrecognized names fall back to [`PlanTier::Free`], the
    /// most restrictive tier.
    pub fn resolve(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_ascii_lowercase()).as_deref() {
            Some("pro") => PlanTier::Pro,
            Some("business") => PlanTier::Business,
            _ => PlanTier::Free,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
            PlanTier::Business => "business",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The upload may proceed; usage was incremented
    Admitted {
        limit: u32,
        remaining: u32,
        reset_in_ms: u64,
        reset_at_ms: i64,
    },
    /// The upload must be aborted; usage is unchanged
    Rejected {
        limit: u32,
        reset_in_ms: u64,
        reset_at_ms: i64,
    },
}

impl Decision {
    pub fn allowed(&self) -> bool {
        matches!(self, Decision::Admitted { .. })
    }

    pub fn limit(&self) -> u32 {
        match self {
            Decision::Admitted { limit, .. } | Decision::Rejected { limit, .. } => *limit,
        }
    }

    pub fn remaining(&self) -> u32 {
        match self {
            Decision::Admitted { remaining, .. } => *remaining,
            Decision::Rejected { .. } => 0,
        }
    }

    pub fn reset_in_ms(&self) -> u64 {
        match self {
            Decision::Admitted { reset_in_ms, .. } | Decision::Rejected { reset_in_ms, .. } => {
                *reset_in_ms
            }
        }
    }

    pub fn reset_at_ms(&self) -> i64 {
        match self {
            Decision::Admitted { reset_at_ms, .. } | Decision::Rejected { reset_at_ms, .. } => {
                *reset_at_ms
            }
        }
    }

    /// User-facing explanation, only for rejections
    pub fn message(&self) -> Option<String> {
        match self {
            Decision::Admitted { .. } => None,
            Decision::Rejected {
                limit, reset_in_ms, ..
            } => Some(rejection_message(*limit, *reset_in_ms)),
        }
    }

    pub fn snapshot(&self) -> RateLimitSnapshot {
        RateLimitSnapshot {
            limit: self.limit(),
            remaining: self.remaining(),
            reset_in_ms: self.reset_in_ms(),
            reset_at_ms: self.reset_at_ms(),
        }
    }
}

/// Message shown to the end user when an upload is rejected
pub fn rejection_message(limit: u32, reset_in_ms: u64) -> String {
    format!(
        "Upload limit reached: {limit} uploads per minute. Try again in {} seconds.",
        ceil_secs(reset_in_ms)
    )
}

/// Read-only usage view for quota display ("X/Y uploads used")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaStatus {
    pub count: u32,
    pub limit: u32,
    pub reset_in_ms: u64,
    pub percentage: u32,
}
