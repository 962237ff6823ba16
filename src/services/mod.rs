//! Runtime services for driving spinners in real time.
//!
//! Requires the `runtime` feature:
//! - `shared`: `SharedSpinner`, a `Mutex`-wrapped spinner that UI handlers and
//!   a timer task can use at once, plus a tokio update loop
//!
//! # Shared State Pattern
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_spinner::services::{spawn_update_loop, SharedSpinner};
//!
//! let shared = Arc::new(SharedSpinner::new(spinner));
//! let (task, shutdown) = spawn_update_loop(Arc::clone(&shared), 10);
//!
//! // UI handlers share the same spinner
//! shared.with_spinner(|spinner| spinner.start_spin_up());
//! ```

#[cfg(feature = "runtime")]
pub mod shared;

#[cfg(feature = "runtime")]
pub use shared::*;
