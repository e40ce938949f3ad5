//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Time sources (wall clock and a manually driven clock for tests)
//! - Rate limiting primitives and the `X-RateLimit-*` header contract
//! - Caller identification from request headers

pub mod client;
pub mod clock;
pub mod rate_limit;
