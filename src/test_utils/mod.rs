//! Test utilities.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory repository implementations for mocking persistence
//! - A scriptable billing provider double
//! - `MirrorHarness`, which wires the use cases to all of the above

mod factories;
mod harness;
mod mirror_mocks;

pub use billing_mocks::*;
pub use factories::*;
pub use harness::*;
pub use mirror_mocks::*;
