//! Application Layer
//!
//! Orchestrates the pure decision logic, the record store and the clock.

pub mod config;
pub mod limiter;
