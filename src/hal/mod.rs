//! Host field and clock implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Test doubles for desktop development and tests
//! - `system`: Wall-clock time source backed by `std::time::Instant`

pub mod mock;
pub mod system;

pub use mock::*;
pub use system::*;
