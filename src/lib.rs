//! # rs-spinner
//!
//! A numeric spinner engine: the value logic behind a text field with
//! increment/decrement buttons.
//!
//! ## Features
//!
//! - **Sanitized configuration**: Loosely typed patches (numbers, text, null)
//!   are coerced into safe settings; bad input degrades, never fails
//! - **Step quantization**: Snap values onto the step grid (none, floor, round, ceil)
//!   and round to a fixed number of decimals without drift
//! - **Boundaries**: Optional min/max with `min` and `max` events
//! - **Hold-to-spin**: Delay, repeat interval, and a booster that doubles the
//!   step during long spins, with an optional cap
//! - **Toolkit independence**: The field and the clock are traits
//!
//! ## Architecture
//!
//! The crate is structured to allow testing without a UI toolkit or real time:
//!
//! - `settings` - Settings, patches, and the sanitizer
//! - `constraint` - Quantization, clamping, and the next-step computation
//! - `format` - Number/text round trip with transform hooks
//! - `spin` - Clock-free spin state machine
//! - `spinner` - Engine facade that ties everything together
//! - `registry` - Side-table of spinners keyed by field id
//! - `attributes` - Settings patches from native and `data-bts-*` attributes
//! - `messages` - JSON requests and snapshots (`serde` feature)
//! - `services` - Shared spinner and tokio update loop (`runtime` feature)
//! - `hal` - Concrete field and clock implementations (mocks for testing)
//!
//! ## Example
//!
//! ```rust
//! use rs_spinner::{Spinner, SettingsPatch, SpinEvent, Outcome};
//! use rs_spinner::hal::{MockClock, MockField};
//!
//! // Create a spinner over a mock field
//! let clock = MockClock::new();
//! let patch = SettingsPatch::new().with_min(0).with_max(10).with_step(1);
//! let mut spinner = Spinner::new(MockField::new("10"), clock.clone(), patch);
//!
//! // Already at the upper bound: only `max` is emitted
//! let events = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
//! let sink = events.clone();
//! spinner.on_event(move |event| sink.lock().unwrap().push(event));
//! assert_eq!(spinner.step_up(), Outcome::Unchanged);
//! assert_eq!(*events.lock().unwrap(), vec![SpinEvent::Max]);
//!
//! // Drive timers from your event loop
//! spinner.start_spin_down();
//! clock.advance(600);
//! spinner.update();
//! assert_eq!(spinner.value(), 8.0);
//! ```

#![warn(missing_docs)]

/// Value constraints: quantization, rounding, clamping, and stepping.
pub mod constraint;
/// Events, outcomes, and subscription ids.
pub mod events;
/// Number formatting and parsing for the field text.
pub mod format;
/// Host field and clock implementations (mocks for testing).
pub mod hal;
/// Text transform hooks.
pub mod hooks;
/// Engine facade for a single field.
pub mod spinner;
/// Settings, configuration patches, and the sanitizer.
pub mod settings;
/// Clock-free spin state machine.
pub mod spin;
/// Host field and clock traits.
pub mod traits;

/// Side-table of spinners keyed by field id.
pub mod registry;

/// Settings patches derived from field attributes.
pub mod attributes;

/// JSON message types (serde-based).
#[cfg(feature = "serde")]
pub mod messages;

/// Real-time update loop (feature-gated).
#[cfg(feature = "runtime")]
pub mod services;

// Re-exports for convenience
pub use events::{ListenerId, ObserverId, Outcome, RejectReason, SpinEvent, StepOutcome};
pub use hooks::{AnyHooks, FnHooks, Identity, TransformHooks};
pub use registry::{FieldId, SpinnerHandle, SpinnerRegistry};
pub use settings::{
    sanitize, ChangedKeys, RawValue, SanitizedPatch, SettingKey, Settings, SettingsPatch,
    StepDivisibility,
};
pub use spin::{Direction, SpinMachine, SpinPhase, SpinState};
pub use spinner::{Listener, SettingObserver, Spinner};
pub use traits::{Clock, HostField};

// Message re-exports
#[cfg(feature = "serde")]
pub use messages::{parse_request, parse_settings_patch, SpinRequest};
