//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (RateLimitRecord)
//! - Domain value objects (Identity, PlanTier, Decision, QuotaStatus)
//! - Domain services (the pure admission decision)
//! - Repository traits (record storage interface)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
