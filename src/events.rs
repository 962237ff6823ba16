//! Events, operation outcomes, and subscription ids.
//!
//! # Event Names
//!
//! Event names are a compatibility surface and never change:
//!
//! | Event | Name | Emitted when |
//! |-------|------|--------------|
//! | [`SpinEvent::Min`] | `min` | A step lands on, or is blocked by, the lower bound |
//! | [`SpinEvent::Max`] | `max` | A step lands on, or is blocked by, the upper bound |
//! | [`SpinEvent::StartSpin`] | `startspin` | A spin starts (either direction) |
//! | [`SpinEvent::StartUpSpin`] | `startupspin` | An upward spin starts |
//! | [`SpinEvent::StartDownSpin`] | `startdownspin` | A downward spin starts |
//! | [`SpinEvent::StopSpin`] | `stopspin` | A spin stops (either direction) |
//! | [`SpinEvent::StopUpSpin`] | `stopupspin` | An upward spin stops |
//! | [`SpinEvent::StopDownSpin`] | `stopdownspin` | A downward spin stops |
//! | [`SpinEvent::Change`] | `change` | A committed value differs from the prior text |
//!
//! Start pairs are emitted general first; stop pairs direction-specific first.

use crate::spin::Direction;

/// Event emitted by a spinner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SpinEvent {
    /// Lower bound reached.
    Min,
    /// Upper bound reached.
    Max,
    /// Spin started.
    StartSpin,
    /// Upward spin started.
    StartUpSpin,
    /// Downward spin started.
    StartDownSpin,
    /// Spin stopped.
    StopSpin,
    /// Upward spin stopped.
    StopUpSpin,
    /// Downward spin stopped.
    StopDownSpin,
    /// Committed value changed.
    Change,
}

impl SpinEvent {
    /// Every event.
    pub const ALL: [SpinEvent; 9] = [
        SpinEvent::Min,
        SpinEvent::Max,
        SpinEvent::StartSpin,
        SpinEvent::StartUpSpin,
        SpinEvent::StartDownSpin,
        SpinEvent::StopSpin,
        SpinEvent::StopUpSpin,
        SpinEvent::StopDownSpin,
        SpinEvent::Change,
    ];

    /// Returns the event name.
    ///
    /// ```
    /// use rs_spinner::SpinEvent;
    ///
    /// assert_eq!(SpinEvent::StartUpSpin.as_str(), "startupspin");
    /// assert_eq!(SpinEvent::Max.as_str(), "max");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SpinEvent::Min => "min",
            SpinEvent::Max => "max",
            SpinEvent::StartSpin => "startspin",
            SpinEvent::StartUpSpin => "startupspin",
            SpinEvent::StartDownSpin => "startdownspin",
            SpinEvent::StopSpin => "stopspin",
            SpinEvent::StopUpSpin => "stopupspin",
            SpinEvent::StopDownSpin => "stopdownspin",
            SpinEvent::Change => "change",
        }
    }

    /// Parse an event from its name.
    pub fn from_text(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|event| event.as_str() == s)
    }

    /// The boundary event for `direction` (`max` up, `min` down).
    pub const fn bound(direction: Direction) -> Self {
        match direction {
            Direction::Up => SpinEvent::Max,
            Direction::Down => SpinEvent::Min,
        }
    }

    /// The direction-specific start event.
    pub const fn start(direction: Direction) -> Self {
        match direction {
            Direction::Up => SpinEvent::StartUpSpin,
            Direction::Down => SpinEvent::StartDownSpin,
        }
    }

    /// The direction-specific stop event.
    pub const fn stop(direction: Direction) -> Self {
        match direction {
            Direction::Up => SpinEvent::StopUpSpin,
            Direction::Down => SpinEvent::StopDownSpin,
        }
    }
}

impl core::fmt::Display for SpinEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason an operation was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RejectReason {
    /// The spinner was destroyed.
    Destroyed,
    /// The host field is disabled.
    Disabled,
    /// The host field is read-only.
    ReadOnly,
    /// The value is not a finite number.
    InvalidValue,
    /// No spinner is registered under the handle or field id.
    UnknownSpinner,
}

/// Result of a spinner operation.
///
/// Operations never fail loudly; callers may ignore the outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "outcome", content = "reason", rename_all = "snake_case"))]
pub enum Outcome {
    /// The operation took effect.
    Applied,
    /// Accepted, but nothing changed (already spinning, already stopped, ...).
    Unchanged,
    /// Refused before any state change.
    Rejected(RejectReason),
}

impl Outcome {
    /// Returns true for [`Outcome::Applied`].
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    /// Returns true for [`Outcome::Rejected`].
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    /// The rejection reason, if rejected.
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Outcome::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Result of a single step attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// The value moved (it may have landed on a bound).
    Moved {
        /// Committed value.
        value: f64,
        /// True if the value now sits on the bound in the step direction.
        at_bound: bool,
    },
    /// The value already sat on the bound; nothing moved.
    AtBound {
        /// Committed value.
        value: f64,
    },
}

impl StepOutcome {
    /// The committed value.
    pub fn value(&self) -> f64 {
        match self {
            StepOutcome::Moved { value, .. } | StepOutcome::AtBound { value } => *value,
        }
    }

    /// Returns true if the value sits on the bound after the step.
    pub fn reached_bound(&self) -> bool {
        match self {
            StepOutcome::Moved { at_bound, .. } => *at_bound,
            StepOutcome::AtBound { .. } => true,
        }
    }
}

/// Identifies a registered event listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u32);

/// Identifies a registered setting observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub(crate) u32);
