//! Host abstractions for the text field a spinner manages and its time source.
//!
//! These traits keep the engine independent of any particular UI toolkit.
//! Adapters for a concrete toolkit implement [`HostField`] over their input
//! widget; tests use the doubles in [`crate::hal::mock`].
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`HostField`] | Text, enabled state, and attributes of the managed field |
//! | [`Clock`] | Monotonic millisecond time source for spin timers |
//!
//! # Example
//!
//! ```rust
//! use rs_spinner::traits::HostField;
//! use rs_spinner::hal::MockField;
//!
//! let mut field = MockField::new("5");
//! field.set_text("6");
//! assert_eq!(field.text(), "6");
//! assert!(field.is_interactive());
//! ```

/// The text-entry field a spinner augments.
///
/// The engine owns the numeric value; the field text is a derived
/// representation that the engine rewrites on every accepted change.
///
/// # Implementation Notes
///
/// - `set_text` must not emit a change notification on its own; the engine
///   calls [`notify_change`](Self::notify_change) when a committed value
///   differs from the previous text.
/// - Attribute names are the host's native names (`min`, `max`, `step`).
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_spinner::traits::HostField;
///
/// struct MyInput { /* widget handle */ }
///
/// impl HostField for MyInput {
///     fn text(&self) -> String { /* read widget */ String::new() }
///     fn set_text(&mut self, text: &str) { /* write widget */ }
///     fn is_disabled(&self) -> bool { false }
///     fn is_readonly(&self) -> bool { false }
///     fn attribute(&self, name: &str) -> Option<String> { None }
///     fn set_attribute(&mut self, name: &str, value: Option<&str>) {}
/// }
/// ```
pub trait HostField {
    /// Current text of the field.
    fn text(&self) -> String;

    /// Replace the text of the field.
    fn set_text(&mut self, text: &str);

    /// Returns true if the field is disabled.
    fn is_disabled(&self) -> bool;

    /// Returns true if the field is read-only.
    fn is_readonly(&self) -> bool;

    /// Read a native attribute.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Set (`Some`) or remove (`None`) a native attribute.
    fn set_attribute(&mut self, name: &str, value: Option<&str>);

    /// Native change notification.
    ///
    /// Default implementation does nothing.
    fn notify_change(&mut self) {}

    /// Returns true if the field accepts stepping and value writes.
    fn is_interactive(&self) -> bool {
        !self.is_disabled() && !self.is_readonly()
    }
}

/// Time source for spin timers.
///
/// Provides monotonic time in milliseconds. On desktop this wraps
/// `std::time::Instant` ([`SystemClock`](crate::hal::SystemClock)); tests use
/// [`MockClock`](crate::hal::MockClock).
///
/// # Example
///
/// ```rust
/// use rs_spinner::traits::Clock;
/// use rs_spinner::hal::MockClock;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}
