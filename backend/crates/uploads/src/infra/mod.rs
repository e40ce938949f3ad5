//! Infrastructure Layer
//!
//! Record storage and background maintenance.

pub mod cleanup;
pub mod memory;
