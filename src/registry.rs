//! Side-table of spinners keyed by field id.
//!
//! A toolkit adapter usually has no place to hang engine state off its
//! widgets. [`SpinnerRegistry`] keeps every spinner in one map keyed by a
//! stable [`FieldId`] and hands out opaque [`SpinnerHandle`]s.
//!
//! # Example
//!
//! ```rust
//! use rs_spinner::registry::SpinnerRegistry;
//! use rs_spinner::hal::{MockClock, MockField};
//! use rs_spinner::{Outcome, SettingsPatch};
//!
//! let mut registry = SpinnerRegistry::new(MockClock::new());
//! let handle = registry.attach("quantity", MockField::new("1"), SettingsPatch::new());
//!
//! assert_eq!(registry.apply(handle, |spinner| spinner.step_up()), Outcome::Applied);
//! assert_eq!(registry.get(handle).map(|s| s.value()), Some(2.0));
//!
//! let field = registry.detach(handle).unwrap();
//! assert_eq!(field.text, "2");
//! assert!(registry.get(handle).is_none());
//! ```

use std::collections::HashMap;

use heapless::String as HString;

use crate::events::{Outcome, RejectReason};
use crate::settings::SettingsPatch;
use crate::spinner::Spinner;
use crate::traits::{Clock, HostField};

/// Maximum length of a field id in bytes.
pub const MAX_FIELD_ID: usize = 64;

/// Stable identifier of a host field.
///
/// Longer ids are truncated on a character boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(HString<MAX_FIELD_ID>);

impl FieldId {
    /// Create an id from text, truncating if too long.
    pub fn new(s: &str) -> Self {
        let mut id = HString::new();
        for c in s.chars() {
            if id.push(c).is_err() {
                break;
            }
        }
        Self(id)
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<&String> for FieldId {
    fn from(s: &String) -> Self {
        Self::new(s)
    }
}

impl core::fmt::Display for FieldId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle to a registered spinner.
///
/// Handles are never reused, so a handle kept after
/// [`detach`](SpinnerRegistry::detach) simply stops resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpinnerHandle(u64);

struct Entry<F: HostField, C: Clock> {
    handle: SpinnerHandle,
    spinner: Spinner<F, C>,
}

/// Map from [`FieldId`] to spinner.
///
/// Every spinner receives a clone of the registry's clock.
pub struct SpinnerRegistry<F: HostField, C: Clock + Clone> {
    entries: HashMap<FieldId, Entry<F, C>>,
    handles: HashMap<SpinnerHandle, FieldId>,
    clock: C,
    next_handle: u64,
}

impl<F: HostField, C: Clock + Clone> SpinnerRegistry<F, C> {
    /// Create an empty registry
    pub fn new(clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            handles: HashMap::new(),
            clock,
            next_handle: 0,
        }
    }

    /// Attach a spinner to the field `id`.
    ///
    /// If `id` is already registered, `patch` is merged through
    /// [`Spinner::update_settings`], `field` is dropped, and the existing
    /// handle is returned.
    pub fn attach(
        &mut self,
        id: impl Into<FieldId>,
        field: F,
        patch: SettingsPatch,
    ) -> SpinnerHandle {
        let id = id.into();
        if let Some(entry) = self.entries.get_mut(&id) {
            log::debug!(target: "spinner.facade", "{} already attached, updating settings", id);
            entry.spinner.update_settings(patch);
            return entry.handle;
        }

        let handle = SpinnerHandle(self.next_handle);
        self.next_handle += 1;
        let spinner = Spinner::new(field, self.clock.clone(), patch);
        self.handles.insert(handle, id.clone());
        self.entries.insert(id, Entry { handle, spinner });
        handle
    }

    /// Destroy a spinner and hand back its field.
    pub fn detach(&mut self, handle: SpinnerHandle) -> Option<F> {
        let id = self.handles.remove(&handle)?;
        let entry = self.entries.remove(&id)?;
        Some(entry.spinner.into_field())
    }

    /// Handle of the spinner attached to `id`
    pub fn handle_of(&self, id: &str) -> Option<SpinnerHandle> {
        self.entries.get(&FieldId::new(id)).map(|entry| entry.handle)
    }

    /// Look up a spinner
    pub fn get(&self, handle: SpinnerHandle) -> Option<&Spinner<F, C>> {
        let id = self.handles.get(&handle)?;
        self.entries.get(id).map(|entry| &entry.spinner)
    }

    /// Look up a spinner mutably
    pub fn get_mut(&mut self, handle: SpinnerHandle) -> Option<&mut Spinner<F, C>> {
        let id = self.handles.get(&handle)?;
        self.entries.get_mut(id).map(|entry| &mut entry.spinner)
    }

    /// Run an operation on a spinner.
    ///
    /// A stale handle yields `Rejected(UnknownSpinner)`.
    pub fn apply<Op>(&mut self, handle: SpinnerHandle, op: Op) -> Outcome
    where
        Op: FnOnce(&mut Spinner<F, C>) -> Outcome,
    {
        match self.get_mut(handle) {
            Some(spinner) => op(spinner),
            None => {
                log::debug!(target: "spinner.facade", "unknown handle {:?}", handle);
                Outcome::Rejected(RejectReason::UnknownSpinner)
            }
        }
    }

    /// Fire due timers on every spinner.
    ///
    /// Returns how many spinners stepped.
    pub fn update_all(&mut self) -> usize {
        self.entries
            .values_mut()
            .map(|entry| entry.spinner.update())
            .filter(Outcome::is_applied)
            .count()
    }

    /// Number of attached spinners
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no spinner is attached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The shared clock
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockClock, MockField};

    fn registry() -> SpinnerRegistry<MockField, MockClock> {
        SpinnerRegistry::new(MockClock::new())
    }

    #[test]
    fn field_id_truncates_on_char_boundary() {
        let long = "é".repeat(40); // 80 bytes
        let id = FieldId::new(&long);
        assert!(id.as_str().len() <= MAX_FIELD_ID);
        assert_eq!(id.as_str(), "é".repeat(32));
    }

    #[test]
    fn field_id_display() {
        assert_eq!(FieldId::from("price").to_string(), "price");
    }

    #[test]
    fn reattach_updates_settings_and_keeps_handle() {
        let mut registry = registry();
        let first = registry.attach("qty", MockField::new("50"), SettingsPatch::new());
        let second = registry.attach("qty", MockField::new("ignored"), SettingsPatch::new().with_max(20));
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        let spinner = registry.get(first).unwrap();
        assert_eq!(spinner.settings().max, Some(20.0));
        assert_eq!(spinner.field().text, "20");
    }

    #[test]
    fn stale_handle_is_rejected() {
        let mut registry = registry();
        let handle = registry.attach("qty", MockField::new("1"), SettingsPatch::new());
        assert!(registry.detach(handle).is_some());
        assert!(registry.detach(handle).is_none());
        assert_eq!(
            registry.apply(handle, |spinner| spinner.step_up()),
            Outcome::Rejected(RejectReason::UnknownSpinner)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn handles_are_not_reused() {
        let mut registry = registry();
        let first = registry.attach("a", MockField::new("1"), SettingsPatch::new());
        registry.detach(first);
        let second = registry.attach("a", MockField::new("1"), SettingsPatch::new());
        assert_ne!(first, second);
        assert_eq!(registry.handle_of("a"), Some(second));
    }

    #[test]
    fn detach_restores_field() {
        let mut registry = registry();
        let field = MockField::new("3").with_attribute("step", "any");
        let handle = registry.attach("a", field, SettingsPatch::new().with_step(3));
        assert_eq!(
            registry.get(handle).unwrap().field().attributes.get("step").map(String::as_str),
            Some("3")
        );
        let field = registry.detach(handle).unwrap();
        assert_eq!(field.attributes.get("step").map(String::as_str), Some("any"));
    }

    #[test]
    fn update_all_drives_every_spinner() {
        let mut registry = registry();
        let a = registry.attach("a", MockField::new("1"), SettingsPatch::new());
        let b = registry.attach("b", MockField::new("50"), SettingsPatch::new());
        registry.attach("c", MockField::new("9"), SettingsPatch::new());
        registry.apply(a, |spinner| spinner.start_spin_up());
        registry.apply(b, |spinner| spinner.start_spin_down());

        registry.clock().advance(600);
        assert_eq!(registry.update_all(), 2);
        assert_eq!(registry.get(a).unwrap().value(), 3.0);
        assert_eq!(registry.get(b).unwrap().value(), 48.0);
    }
}
