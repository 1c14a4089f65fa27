//! Common test utilities for controlplane-ir
//!
//! Shared program fixtures, record builders and assertions for the
//! integration tests.

#![allow(dead_code, unused_imports)]

mod assertions;
mod builders;
mod fixtures;

// Re-export all utilities
pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
