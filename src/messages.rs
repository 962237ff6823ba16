//! JSON message types for driving and observing spinners.
//!
//! Requires the `serde` feature. Settings patches are loosely typed: every
//! numeric key accepts a number, numeric text, or `null`.
//!
//! # Example
//!
//! ```
//! use rs_spinner::messages::parse_settings_patch;
//! use rs_spinner::Settings;
//!
//! let patch = parse_settings_patch(r#"{"min": null, "max": "50", "step": 5}"#).unwrap();
//! let settings = Settings::from_patch(&patch);
//! assert_eq!(settings.min, None);
//! assert_eq!(settings.max, Some(50.0));
//! assert_eq!(settings.step, 5.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::events::{Outcome, SpinEvent};
use crate::settings::{RawValue, Settings, SettingsPatch, StepDivisibility};
use crate::spin::{SpinPhase, SpinState};
use crate::spinner::Spinner;
use crate::traits::{Clock, HostField};

// ============================================================================
// Requests
// ============================================================================

/// An operation requested over the wire.
///
/// # JSON Examples
///
/// ```json
/// {"action": "step_up"}
/// {"action": "start_spin_down"}
/// {"action": "set_value", "value": "12.5"}
/// {"action": "update_settings", "patch": {"max": 20}}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SpinRequest {
    /// Single step up.
    StepUp,
    /// Single step down.
    StepDown,
    /// Start spinning up.
    StartSpinUp,
    /// Start spinning down.
    StartSpinDown,
    /// Stop spinning.
    StopSpin,
    /// Validate the current text.
    Commit,
    /// Set the value.
    SetValue {
        /// Number or text.
        value: RawValue,
    },
    /// Merge a settings patch.
    UpdateSettings {
        /// The patch.
        patch: SettingsPatch,
    },
}

impl SpinRequest {
    /// Run the request against a spinner.
    pub fn apply<F: HostField, C: Clock>(self, spinner: &mut Spinner<F, C>) -> Outcome {
        match self {
            SpinRequest::StepUp => spinner.step_up(),
            SpinRequest::StepDown => spinner.step_down(),
            SpinRequest::StartSpinUp => spinner.start_spin_up(),
            SpinRequest::StartSpinDown => spinner.start_spin_down(),
            SpinRequest::StopSpin => spinner.stop_spin(),
            SpinRequest::Commit => spinner.commit(),
            SpinRequest::SetValue { value } => spinner.set_value(value),
            SpinRequest::UpdateSettings { patch } => spinner.update_settings(patch),
        }
    }
}

/// Parse a settings patch from JSON text.
///
/// Unknown keys are ignored.
pub fn parse_settings_patch(json: &str) -> Result<SettingsPatch, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse a request from JSON text.
///
/// ```
/// use rs_spinner::messages::{parse_request, SpinRequest};
///
/// let request = parse_request(r#"{"action": "start_spin_up"}"#).unwrap();
/// assert_eq!(request, SpinRequest::StartSpinUp);
/// ```
pub fn parse_request(json: &str) -> Result<SpinRequest, serde_json::Error> {
    serde_json::from_str(json)
}

// ============================================================================
// Responses
// ============================================================================

/// Serializable view of [`Settings`] (hooks reduced to a flag).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsSnapshot {
    /// Lower bound (`null` = unbounded).
    pub min: Option<f64>,
    /// Upper bound (`null` = unbounded).
    pub max: Option<f64>,
    /// Step.
    pub step: f64,
    /// Decimals.
    pub decimals: u32,
    /// Snapping policy.
    pub force_step_divisibility: StepDivisibility,
    /// Booster flag.
    pub booster: bool,
    /// Ticks per doubling.
    pub boost_every: u32,
    /// Boost cap (`null` = uncapped).
    pub max_boosted_step: Option<f64>,
    /// Repeat interval.
    pub step_interval_ms: u64,
    /// Repeat delay.
    pub step_interval_delay_ms: u64,
    /// True if custom transform hooks are installed.
    pub custom_hooks: bool,
    /// Initial value.
    pub initial_value: Option<f64>,
    /// Replacement value.
    pub replacement_value_when_empty: Option<f64>,
}

impl From<&Settings> for SettingsSnapshot {
    fn from(settings: &Settings) -> Self {
        Self {
            min: settings.min,
            max: settings.max,
            step: settings.step,
            decimals: settings.decimals,
            force_step_divisibility: settings.force_step_divisibility,
            booster: settings.booster,
            boost_every: settings.boost_every,
            max_boosted_step: settings.max_boosted_step,
            step_interval_ms: settings.step_interval_ms,
            step_interval_delay_ms: settings.step_interval_delay_ms,
            custom_hooks: !settings.hooks.is_identity(),
            initial_value: settings.initial_value,
            replacement_value_when_empty: settings.replacement_value_when_empty,
        }
    }
}

/// Serializable snapshot of a spinner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinnerSnapshot {
    /// Field text.
    pub text: String,
    /// Parsed value (`null` if unparsable).
    pub value: Option<f64>,
    /// Spin state.
    pub spin: SpinState,
    /// Timer phase.
    pub phase: SpinPhase,
    /// True once destroyed.
    pub destroyed: bool,
}

impl SpinnerSnapshot {
    /// Capture the state of `spinner`.
    pub fn capture<F: HostField, C: Clock>(spinner: &Spinner<F, C>) -> Self {
        let value = spinner.value();
        Self {
            text: spinner.field().text(),
            value: value.is_finite().then_some(value),
            spin: spinner.spin_state(),
            phase: spinner.phase(),
            destroyed: spinner.is_destroyed(),
        }
    }
}

/// An event stamped with the time it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventMessage {
    /// Clock time in milliseconds.
    pub at_ms: u64,
    /// The event.
    pub event: SpinEvent,
}
