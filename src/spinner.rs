//! Engine facade that ties settings, constraints, formatting, and spin
//! timing together.
//!
//! This module provides [`Spinner`], the object an embedding application
//! holds for each numeric field.
//!
//! # Overview
//!
//! The spinner:
//! - Owns the effective [`Settings`] and merges configuration patches
//! - Steps the value up or down, boundary-aware
//! - Runs hold-to-repeat spins with a delay, an interval, and a booster
//! - Emits [`SpinEvent`]s to listeners and setting changes to observers
//! - Restores the field's original attributes on [`destroy`](Spinner::destroy)
//!
//! # Example
//!
//! ```rust
//! use rs_spinner::{Spinner, SettingsPatch, SpinEvent};
//! use rs_spinner::hal::{MockClock, MockField};
//! use std::sync::{Arc, Mutex};
//!
//! let clock = MockClock::new();
//! let patch = SettingsPatch::new().with_max(10);
//! let mut spinner = Spinner::new(MockField::new("8"), clock.clone(), patch);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! spinner.on_event(move |event| sink.lock().unwrap().push(event));
//!
//! // Hold the up button: one immediate step, then repeats after the delay
//! spinner.start_spin_up();
//! assert_eq!(spinner.value(), 9.0);
//!
//! clock.advance(600);
//! spinner.update();
//! assert_eq!(spinner.value(), 10.0);
//!
//! spinner.stop_spin();
//! assert!(seen.lock().unwrap().contains(&SpinEvent::Max));
//! ```
//!
//! # Timers
//!
//! Nothing runs in the background. Call [`update`](Spinner::update) from the
//! host's event loop (or use the `runtime` feature's update loop); it reads
//! the [`Clock`] and fires every timer that is due.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::constraint::{apply_constraints, clamp_to_bounds, is_at_bound, next_value};
use crate::events::{ListenerId, ObserverId, Outcome, RejectReason, SpinEvent, StepOutcome};
use crate::format::{format_value, parse_value};
use crate::settings::{sanitize, ChangedKeys, RawValue, SettingKey, Settings, SettingsPatch};
use crate::spin::{Direction, SpinMachine, SpinPhase, SpinState};
use crate::traits::{Clock, HostField};

/// Boxed event listener.
pub type Listener = Box<dyn FnMut(SpinEvent) + Send>;

/// Boxed setting observer; receives the settings after the change.
pub type SettingObserver = Box<dyn FnMut(&Settings) + Send>;

/// Native attributes mirrored from the settings.
const NATIVE_ATTRIBUTES: [&str; 3] = ["min", "max", "step"];

struct ObserverEntry {
    id: ObserverId,
    key: SettingKey,
    callback: SettingObserver,
}

/// Numeric spinner engine for one host field.
///
/// # Type Parameters
///
/// - `F`: The managed field ([`HostField`] trait)
/// - `C`: The time source ([`Clock`] trait)
///
/// # Thread Safety
///
/// The spinner itself is not thread-safe. To drive it from a timer task
/// and UI handlers at once, wrap it in `Arc<Mutex<Spinner<..>>>` or use
/// `SharedSpinner` from the services module (requires the `runtime`
/// feature).
pub struct Spinner<F: HostField, C: Clock> {
    field: F,
    clock: C,
    settings: Settings,
    spin: SpinMachine,
    listeners: Vec<(ListenerId, Listener)>,
    observers: Vec<ObserverEntry>,
    next_id: u32,
    original_attributes: Vec<(&'static str, Option<String>)>,
    destroyed: bool,
}

impl<F: HostField, C: Clock> Spinner<F, C> {
    /// Attach a spinner to `field`.
    ///
    /// The patch is sanitized over the defaults. An empty field receives
    /// `initial_value` when one is configured; the text is then brought onto
    /// the step grid and into range without a change notification.
    pub fn new(field: F, clock: C, patch: SettingsPatch) -> Self {
        let settings = Settings::from_patch(&patch);
        let original_attributes = NATIVE_ATTRIBUTES
            .iter()
            .map(|name| (*name, field.attribute(name)))
            .collect();

        let mut spinner = Self {
            field,
            clock,
            settings,
            spin: SpinMachine::new(),
            listeners: Vec::new(),
            observers: Vec::new(),
            next_id: 0,
            original_attributes,
            destroyed: false,
        };

        if let Some(initial) = spinner.settings.initial_value {
            if spinner.field.text().trim().is_empty() {
                let text = format_value(initial, &spinner.settings);
                spinner.field.set_text(&text);
            }
        }
        spinner.check_value(false);
        spinner.sync_native_attributes();

        log::debug!(
            target: "spinner.facade",
            "attached: min={:?} max={:?} step={} decimals={}",
            spinner.settings.min,
            spinner.settings.max,
            spinner.settings.step,
            spinner.settings.decimals
        );
        spinner
    }

    // ========================================================================
    // Stepping
    // ========================================================================

    /// Step the value up once.
    pub fn step_up(&mut self) -> Outcome {
        self.step(Direction::Up)
    }

    /// Step the value down once.
    pub fn step_down(&mut self) -> Outcome {
        self.step(Direction::Down)
    }

    /// Single discrete step in `direction`.
    ///
    /// At the bound the boundary event is emitted and the value stays.
    pub fn step(&mut self, direction: Direction) -> Outcome {
        if let Err(reason) = self.check_interactive() {
            return self.reject("step", reason);
        }
        match self.step_once(direction, 0) {
            StepOutcome::Moved { .. } => Outcome::Applied,
            StepOutcome::AtBound { .. } => Outcome::Unchanged,
        }
    }

    fn step_once(&mut self, direction: Direction, step_count: u32) -> StepOutcome {
        let current = parse_value(&self.field.text(), &self.settings);

        if current.is_finite() && is_at_bound(current, direction, &self.settings) {
            let value = clamp_to_bounds(current, self.settings.min, self.settings.max);
            self.commit_value(value);
            self.emit(SpinEvent::bound(direction));
            return StepOutcome::AtBound { value };
        }

        let value = next_value(current, direction, step_count, &self.settings);
        self.commit_value(value);
        let at_bound = is_at_bound(value, direction, &self.settings);
        if at_bound {
            self.emit(SpinEvent::bound(direction));
        }
        StepOutcome::Moved { value, at_bound }
    }

    // ========================================================================
    // Spinning
    // ========================================================================

    /// Start spinning up.
    pub fn start_spin_up(&mut self) -> Outcome {
        self.start_spin(Direction::Up)
    }

    /// Start spinning down.
    pub fn start_spin_down(&mut self) -> Outcome {
        self.start_spin(Direction::Down)
    }

    /// Start a hold-to-repeat spin in `direction`.
    ///
    /// - Same direction already spinning: returns `Unchanged`, emitting only
    ///   the boundary event if the value sits at the bound
    /// - Opposite direction spinning: that spin is stopped first
    /// - Value already at the bound: boundary event only, no spin
    ///
    /// Otherwise emits `startspin` and the direction-specific start event,
    /// steps once immediately, and arms the delay unless that step reached
    /// the bound.
    pub fn start_spin(&mut self, direction: Direction) -> Outcome {
        if let Err(reason) = self.check_interactive() {
            return self.reject("start_spin", reason);
        }

        match self.spin.direction() {
            Some(current) if current == direction => {
                let value = parse_value(&self.field.text(), &self.settings);
                if value.is_finite() && is_at_bound(value, direction, &self.settings) {
                    self.emit(SpinEvent::bound(direction));
                }
                return Outcome::Unchanged;
            }
            Some(_) => {
                self.stop_spin();
            }
            None => {}
        }

        let current = parse_value(&self.field.text(), &self.settings);
        if current.is_finite() && is_at_bound(current, direction, &self.settings) {
            self.emit(SpinEvent::bound(direction));
            return Outcome::Unchanged;
        }

        self.spin.begin(direction);
        self.emit(SpinEvent::StartSpin);
        self.emit(SpinEvent::start(direction));

        if self.step_once(direction, 0).reached_bound() {
            log::trace!(target: "spinner.spin", "immediate step reached bound, timers not armed");
            return Outcome::Applied;
        }

        let now_ms = self.clock.now_ms();
        self.spin.arm(now_ms, self.settings.step_interval_delay_ms);
        Outcome::Applied
    }

    /// Stop any spin.
    ///
    /// Cancels both timers. If a spin was active, emits the
    /// direction-specific stop event and then `stopspin`. Idempotent.
    pub fn stop_spin(&mut self) -> Outcome {
        if self.destroyed {
            return self.reject("stop_spin", RejectReason::Destroyed);
        }
        match self.spin.stop() {
            Some(direction) => {
                self.emit(SpinEvent::stop(direction));
                self.emit(SpinEvent::StopSpin);
                Outcome::Applied
            }
            None => Outcome::Unchanged,
        }
    }

    /// Fire every timer due at the clock's current time.
    ///
    /// Missed interval ticks are caught up in order. A spin on a field that
    /// has since become disabled or read-only is stopped instead.
    pub fn update(&mut self) -> Outcome {
        if self.destroyed {
            return Outcome::Rejected(RejectReason::Destroyed);
        }
        if !self.spin.is_spinning() {
            return Outcome::Unchanged;
        }
        if !self.field.is_interactive() {
            log::debug!(target: "spinner.spin", "field no longer interactive, stopping spin");
            self.stop_spin();
            return Outcome::Applied;
        }

        let now_ms = self.clock.now_ms();
        let mut ticked = false;
        while let Some(direction) = self.spin.direction() {
            let Some(step_count) = self.spin.poll(now_ms, self.settings.step_interval_ms) else {
                break;
            };
            log::trace!(target: "spinner.spin", "tick {} {}", step_count, direction.as_str());
            self.step_once(direction, step_count);
            ticked = true;
        }

        if ticked {
            Outcome::Applied
        } else {
            Outcome::Unchanged
        }
    }

    // ========================================================================
    // Value
    // ========================================================================

    /// Parse the field's current text (NaN if unparsable).
    pub fn value(&self) -> f64 {
        parse_value(&self.field.text(), &self.settings)
    }

    /// Set the value (number or text).
    ///
    /// Rejected if the field is not interactive or the value is not a
    /// finite number. Otherwise constrained, formatted, and written.
    pub fn set_value(&mut self, value: impl Into<RawValue>) -> Outcome {
        if let Err(reason) = self.check_interactive() {
            return self.reject("set_value", reason);
        }
        let value = match value.into() {
            RawValue::Text(text) => parse_value(&text, &self.settings),
            other => other.to_number(),
        };
        if !value.is_finite() {
            return self.reject("set_value", RejectReason::InvalidValue);
        }
        let value = apply_constraints(value, &self.settings);
        if self.commit_value(value) {
            Outcome::Applied
        } else {
            Outcome::Unchanged
        }
    }

    /// Validate the field text in place (the blur / enter path).
    ///
    /// Empty text takes the replacement value when one is configured and is
    /// otherwise left empty. Unparsable text takes the replacement value or
    /// `0`. Anything else is constrained and re-formatted.
    pub fn commit(&mut self) -> Outcome {
        if self.destroyed {
            return self.reject("commit", RejectReason::Destroyed);
        }
        if self.check_value(true) {
            Outcome::Applied
        } else {
            Outcome::Unchanged
        }
    }

    fn check_value(&mut self, notify: bool) -> bool {
        let text = self.field.text();
        let parsed = parse_value(&text, &self.settings);
        let replacement = self.settings.replacement_value_when_empty;

        let target = if text.trim().is_empty() {
            match replacement {
                Some(value) => value,
                None => return false,
            }
        } else if !parsed.is_finite() {
            log::debug!(target: "spinner.facade", "unparsable text {:?}", text);
            replacement.unwrap_or(0.0)
        } else {
            parsed
        };

        let value = apply_constraints(target, &self.settings);
        let formatted = format_value(value, &self.settings);
        if formatted == text {
            return false;
        }
        self.field.set_text(&formatted);
        if notify {
            self.field.notify_change();
            self.emit(SpinEvent::Change);
        }
        true
    }

    /// Write `value` if its text differs; returns true if written.
    fn commit_value(&mut self, value: f64) -> bool {
        let text = format_value(value, &self.settings);
        if self.field.text() == text {
            return false;
        }
        self.field.set_text(&text);
        self.field.notify_change();
        self.emit(SpinEvent::Change);
        true
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Merge a configuration patch.
    ///
    /// The patch is sanitized against the current settings. Changes take
    /// effect from the next step or tick; a parsable current value is
    /// re-constrained immediately. Observers of each changed key are
    /// notified once.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Outcome {
        if self.destroyed {
            return self.reject("update_settings", RejectReason::Destroyed);
        }
        let sanitized = sanitize(&patch, &self.settings);
        let changed = self.settings.apply(sanitized);
        if changed.is_empty() {
            return Outcome::Unchanged;
        }

        log::debug!(
            target: "spinner.settings",
            "changed: {:?}",
            changed.iter().map(SettingKey::as_str).collect::<Vec<_>>()
        );

        if changed
            .iter()
            .any(|key| matches!(key, SettingKey::Min | SettingKey::Max | SettingKey::Step))
        {
            self.sync_native_attributes();
        }

        let current = self.value();
        if current.is_finite() {
            self.commit_value(apply_constraints(current, &self.settings));
        }

        self.notify_observers(&changed);
        Outcome::Applied
    }

    /// Inbound notification that the field's bound or step attributes
    /// changed outside the engine.
    pub fn on_external_attribute_change(&mut self, patch: SettingsPatch) -> Outcome {
        self.update_settings(patch)
    }

    /// Register `callback` for changes to `key`.
    pub fn observe_setting<Cb>(&mut self, key: SettingKey, callback: Cb) -> ObserverId
    where
        Cb: FnMut(&Settings) + Send + 'static,
    {
        let id = ObserverId(self.allocate_id());
        if self.destroyed {
            return id;
        }
        self.observers.push(ObserverEntry {
            id,
            key,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a setting observer. Returns true if it was registered.
    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|entry| entry.id != id);
        self.observers.len() != before
    }

    fn notify_observers(&mut self, changed: &ChangedKeys) {
        let settings = &self.settings;
        for entry in self.observers.iter_mut() {
            if !changed.contains(&entry.key) {
                continue;
            }
            let callback = &mut entry.callback;
            if catch_unwind(AssertUnwindSafe(|| callback(settings))).is_err() {
                log::warn!(
                    target: "spinner.facade",
                    "observer {:?} for {} panicked",
                    entry.id,
                    entry.key.as_str()
                );
            }
        }
    }

    fn sync_native_attributes(&mut self) {
        let min = self.settings.min.map(|value| value.to_string());
        let max = self.settings.max.map(|value| value.to_string());
        let step = self.settings.step.to_string();
        self.field.set_attribute("min", min.as_deref());
        self.field.set_attribute("max", max.as_deref());
        self.field.set_attribute("step", Some(&step));
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Register an event listener.
    pub fn on_event<Cb>(&mut self, callback: Cb) -> ListenerId
    where
        Cb: FnMut(SpinEvent) + Send + 'static,
    {
        let id = ListenerId(self.allocate_id());
        if !self.destroyed {
            self.listeners.push((id, Box::new(callback)));
        }
        id
    }

    /// Remove an event listener. Returns true if it was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: SpinEvent) {
        log::trace!(target: "spinner.facade", "emit {}", event);
        for (id, listener) in self.listeners.iter_mut() {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                log::warn!(target: "spinner.facade", "listener {:?} panicked on {}", id, event);
            }
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Tear down: stop any spin, detach listeners and observers, and restore
    /// the field's original attributes.
    ///
    /// Every later operation is a rejected no-op. Calling twice is safe.
    pub fn destroy(&mut self) -> Outcome {
        if self.destroyed {
            return Outcome::Unchanged;
        }
        self.stop_spin();
        self.listeners.clear();
        self.observers.clear();
        for (name, value) in &self.original_attributes {
            self.field.set_attribute(name, value.as_deref());
        }
        self.destroyed = true;
        log::debug!(target: "spinner.facade", "destroyed");
        Outcome::Applied
    }

    /// Check if destroyed
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current spin state
    pub fn spin_state(&self) -> SpinState {
        self.spin.state()
    }

    /// Current timer phase
    pub fn phase(&self) -> SpinPhase {
        self.spin.phase()
    }

    /// Check if spinning
    pub fn is_spinning(&self) -> bool {
        self.spin.is_spinning()
    }

    /// Effective settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The managed field
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Mutable access to the managed field
    pub fn field_mut(&mut self) -> &mut F {
        &mut self.field
    }

    /// The time source
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Destroy the spinner and hand back the field.
    pub fn into_field(mut self) -> F {
        self.destroy();
        self.field
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn check_interactive(&self) -> Result<(), RejectReason> {
        if self.destroyed {
            Err(RejectReason::Destroyed)
        } else if self.field.is_disabled() {
            Err(RejectReason::Disabled)
        } else if self.field.is_readonly() {
            Err(RejectReason::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn reject(&self, operation: &str, reason: RejectReason) -> Outcome {
        log::debug!(target: "spinner.facade", "{} rejected: {:?}", operation, reason);
        Outcome::Rejected(reason)
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

impl<F: HostField, C: Clock> core::fmt::Debug for Spinner<F, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Spinner")
            .field("settings", &self.settings)
            .field("spin", &self.spin)
            .field("listeners", &self.listeners.len())
            .field("observers", &self.observers.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
