//! API DTOs (Data Transfer Objects)

use serde::Serialize;

use crate::domain::value_objects::{Decision, QuotaStatus};

/// Response for POST /check
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_in: u64,
}

impl From<&Decision> for CheckResponse {
    fn from(decision: &Decision) -> Self {
        Self {
            allowed: decision.allowed(),
            limit: decision.limit(),
            remaining: decision.remaining(),
            reset_in: decision.reset_in_ms(),
        }
    }
}

/// Response for GET /status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub count: u32,
    pub limit: u32,
    pub reset_in: u64,
    pub percentage: u32,
}

impl From<QuotaStatus> for StatusResponse {
    fn from(status: QuotaStatus) -> Self {
        Self {
            count: status.count,
            limit: status.limit,
            reset_in: status.reset_in_ms,
            percentage: status.percentage,
        }
    }
}
