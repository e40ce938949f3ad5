//! In-memory record store
//!
//! Lost on restart. A multi-instance deployment needs a shared store with
//! atomic increment-and-expire behind the same trait.

use std::collections::HashMap;

use crate::domain::entities::RateLimitRecord;
use crate::domain::repository::RecordStore;
use crate::domain::value_objects::Identity;

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: HashMap<Identity, RateLimitRecord>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, identity: &Identity) -> Option<RateLimitRecord> {
        self.records.get(identity).copied()
    }

    fn set(&mut self, identity: &Identity, record: RateLimitRecord) {
        self.records.insert(identity.clone(), record);
    }

    fn delete(&mut self, identity: &Identity) -> bool {
        self.records.remove(identity).is_some()
    }

    fn sweep_expired(&mut self, now_ms: i64) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired(now_ms));
        before - self.records.len()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
