//! Domain Entities

/// Per-identity upload counter for the current window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    /// Admitted uploads in the current window
    pub count: u32,
    /// Epoch milliseconds at which the window closes
    pub window_reset_at_ms: i64,
}

impl RateLimitRecord {
    /// Open a fresh window holding the attempt that opened it
    pub fn start(now_ms: i64, window_ms: i64) -> Self {
        Self {
            count: 1,
            window_reset_at_ms: now_ms.saturating_add(window_ms),
        }
    }

    /// A window is closed from its reset instant onwards
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.window_reset_at_ms
    }

    /// Milliseconds left in the window, 0 once expired
    pub fn reset_in_ms(&self, now_ms: i64) -> u64 {
        u64::try_from(self.window_reset_at_ms.saturating_sub(now_ms)).unwrap_or(0)
    }
}
