//! Repository Traits
//!
//! Storage interface for rate limit records. The limiter serializes every
//! call, so implementations need no internal locking; a backend that is
//! shared between processes must provide its own atomicity.

use crate::domain::entities::RateLimitRecord;
use crate::domain::value_objects::Identity;

/// Record storage keyed by identity
pub trait RecordStore: Send {
    fn get(&self, identity: &Identity) -> Option<RateLimitRecord>;

    /// Insert or overwrite the record for `identity`
    fn set(&mut self, identity: &Identity, record: RateLimitRecord);

    /// Remove the record, returning whether one existed
    fn delete(&mut self, identity: &Identity) -> bool;

    /// Remove every record whose window closed at or before `now_ms`
    ///
    /// Returns the number of records removed.
    fn sweep_expired(&mut self, now_ms: i64) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
