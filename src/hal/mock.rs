//! Mock implementations for testing without a UI toolkit.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockField`] | [`HostField`] | In-memory text field that records writes |
//! | [`MockClock`] | [`Clock`] | Controllable, shareable time source |
//!
//! # Example
//!
//! ```rust
//! use rs_spinner::{Spinner, SettingsPatch};
//! use rs_spinner::hal::{MockClock, MockField};
//!
//! let clock = MockClock::new();
//! let mut spinner = Spinner::new(MockField::new("5"), clock.clone(), SettingsPatch::new());
//!
//! spinner.step_up();
//! assert_eq!(spinner.field().text, "6");
//! assert_eq!(spinner.field().change_count, 1);
//! ```
//!
//! [`HostField`]: crate::traits::HostField
//! [`Clock`]: crate::traits::Clock

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::traits::{Clock, HostField};

/// Mock text field.
///
/// Records every text write and change notification. Use the public fields
/// to inspect state after test operations, or to simulate user typing and
/// toggling of the disabled / read-only flags.
///
/// # Example
///
/// ```rust
/// use rs_spinner::hal::MockField;
/// use rs_spinner::traits::HostField;
///
/// let mut field = MockField::new("1").with_attribute("max", "10");
/// field.set_text("2");
/// field.notify_change();
///
/// assert_eq!(field.text, "2");
/// assert_eq!(field.attribute("max").as_deref(), Some("10"));
/// assert_eq!(field.text_writes, 1);
/// assert_eq!(field.change_count, 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MockField {
    /// Current text.
    pub text: String,
    /// Disabled flag.
    pub disabled: bool,
    /// Read-only flag.
    pub readonly: bool,
    /// Native attributes.
    pub attributes: BTreeMap<String, String>,
    /// Number of `set_text` calls.
    pub text_writes: u32,
    /// Number of change notifications.
    pub change_count: u32,
}

impl MockField {
    /// Creates an enabled, writable field with the given text.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    /// Adds a native attribute.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Marks the field disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Marks the field read-only.
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Simulates the user typing, without notifications.
    pub fn type_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

impl HostField for MockField {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.text_writes += 1;
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn is_readonly(&self) -> bool {
        self.readonly
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.attributes.insert(name.to_string(), value.to_string());
            }
            None => {
                self.attributes.remove(name);
            }
        }
    }

    fn notify_change(&mut self) {
        self.change_count += 1;
    }
}

/// Mock clock for testing timer behavior.
///
/// Clones share the same time, so a test can keep one handle while the
/// spinner owns another.
///
/// # Example
///
/// ```rust
/// use rs_spinner::hal::MockClock;
/// use rs_spinner::traits::Clock;
///
/// let clock = MockClock::new();
/// let shared = clock.clone();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.set(1000);
/// assert_eq!(shared.now_ms(), 1000);
///
/// shared.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockClock {
    current_ms: Arc<AtomicU64>,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock clock starting at `ms`.
    pub fn starting_at(ms: u64) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    /// Sets the current time in milliseconds.
    pub fn set(&self, ms: u64) {
        self.current_ms.store(ms, Ordering::SeqCst);
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, ms: u64) {
        self.current_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms.load(Ordering::SeqCst)
    }
}
