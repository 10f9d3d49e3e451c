//! Testing utilities and mock implementations
//!
//! This module provides mock implementations for testing the bridge without
//! a reachable backend.

pub mod mocks;

pub use mocks::*;
