//! Trait definitions for the host field and time source.
//!
//! This module defines the abstractions that let the spinner engine run:
//! - Against any toolkit's text-entry widget ([`HostField`])
//! - With real or simulated time ([`Clock`])
//! - With caller-supplied text transforms ([`TransformHooks`])
//!
//! # Submodules
//!
//! - `host`: Host field and clock
//!
//! The transform hook strategy lives in [`crate::hooks`] and is re-exported
//! here for convenience.
//!
//! [`TransformHooks`]: crate::hooks::TransformHooks

pub mod host;

pub use crate::hooks::TransformHooks;
pub use host::*;
