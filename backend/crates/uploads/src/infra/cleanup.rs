//! Periodic sweep of expired rate limit records
//!
//! Nothing runs until the host calls [`UploadRateLimiter::start_cleanup`],
//! and the task is gone once [`CleanupHandle::stop`] resolves.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::application::limiter::UploadRateLimiter;
use crate::domain::repository::RecordStore;
use crate::error::{UploadLimitError, UploadResult};

/// Handle to a running cleanup task
pub struct CleanupHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CleanupHandle {
    /// Signal the task and wait for it to exit
    pub async fn stop(self) {
        // Err only if the task already exited
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Upload limit cleanup task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<S> UploadRateLimiter<S>
where
    S: RecordStore + 'static,
{
    /// Sweep expired records every `config.cleanup_interval`
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_cleanup(self: &Arc<Self>) -> UploadResult<CleanupHandle> {
        self.start_cleanup_every(self.config().cleanup_interval)
    }

    /// Sweep expired records every `interval`
    ///
    /// A zero interval is refused before anything is spawned.
    pub fn start_cleanup_every(
        self: &Arc<Self>,
        interval: Duration,
    ) -> UploadResult<CleanupHandle> {
        if interval.is_zero() {
            return Err(UploadLimitError::InvalidConfig(
                "cleanup interval must be greater than zero".to_string(),
            ));
        }

        let limiter = Arc::clone(self);
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(
                interval_secs = interval.as_secs(),
                "Upload limit cleanup task started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        limiter.cleanup_expired();
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::info!("Upload limit cleanup task stopped");
        });

        Ok(CleanupHandle { shutdown, task })
    }
}
