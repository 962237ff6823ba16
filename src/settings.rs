//! Spinner settings, configuration patches, and the sanitizer.
//!
//! Configuration arrives as a [`SettingsPatch`]: a partial, loosely typed
//! record (values may be numbers, text, or null, as they come from markup
//! attributes or JSON). [`sanitize`] coerces the keys present in a patch into
//! a [`SanitizedPatch`] of safe values, and [`Settings::apply`] merges it in
//! place, reporting which keys changed.
//!
//! Invalid input never fails; it degrades to a safe default.
//!
//! # Example
//!
//! ```rust
//! use rs_spinner::settings::{sanitize, Settings, SettingsPatch, SettingKey};
//!
//! let mut settings = Settings::default();
//!
//! // Inverted bounds are swapped, a zero step falls back to 1
//! let patch = SettingsPatch::new().with_min(100).with_max(50).with_step(0);
//! let changed = settings.apply(sanitize(&patch, &settings));
//!
//! assert_eq!(settings.min, Some(50.0));
//! assert_eq!(settings.max, Some(100.0));
//! assert_eq!(settings.step, 1.0);
//! assert!(changed.contains(&SettingKey::Min));
//! ```

use crate::hooks::AnyHooks;
use heapless::Vec as HVec;

/// Largest accepted number of fractional digits.
pub const MAX_DECIMALS: u32 = 20;

/// Number of distinct setting keys.
pub const SETTING_KEY_COUNT: usize = 13;

/// Set of keys touched by an update (fixed capacity, no allocation).
pub type ChangedKeys = HVec<SettingKey, SETTING_KEY_COUNT>;

// ============================================================================
// Keys
// ============================================================================

/// Identifies one setting, for change notification and observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SettingKey {
    /// Lower bound.
    Min,
    /// Upper bound.
    Max,
    /// Step quantum.
    Step,
    /// Fractional digits shown and kept.
    Decimals,
    /// Grid snapping policy.
    ForceStepDivisibility,
    /// Spin acceleration on/off.
    Booster,
    /// Steps per doubling of the boosted step.
    BoostEvery,
    /// Cap on the boosted step.
    MaxBoostedStep,
    /// Interval between repeated steps.
    StepIntervalMs,
    /// Delay before repeated stepping begins.
    StepIntervalDelayMs,
    /// Text transform hooks.
    Hooks,
    /// Value written into an empty field at construction.
    InitialValue,
    /// Value substituted for empty or unparsable text.
    ReplacementValueWhenEmpty,
}

impl SettingKey {
    /// Every key, in declaration order.
    pub const ALL: [SettingKey; SETTING_KEY_COUNT] = [
        SettingKey::Min,
        SettingKey::Max,
        SettingKey::Step,
        SettingKey::Decimals,
        SettingKey::ForceStepDivisibility,
        SettingKey::Booster,
        SettingKey::BoostEvery,
        SettingKey::MaxBoostedStep,
        SettingKey::StepIntervalMs,
        SettingKey::StepIntervalDelayMs,
        SettingKey::Hooks,
        SettingKey::InitialValue,
        SettingKey::ReplacementValueWhenEmpty,
    ];

    /// Returns the key as a snake_case string.
    ///
    /// ```
    /// use rs_spinner::SettingKey;
    ///
    /// assert_eq!(SettingKey::StepIntervalDelayMs.as_str(), "step_interval_delay_ms");
    /// ```
    pub const fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Min => "min",
            SettingKey::Max => "max",
            SettingKey::Step => "step",
            SettingKey::Decimals => "decimals",
            SettingKey::ForceStepDivisibility => "force_step_divisibility",
            SettingKey::Booster => "booster",
            SettingKey::BoostEvery => "boost_every",
            SettingKey::MaxBoostedStep => "max_boosted_step",
            SettingKey::StepIntervalMs => "step_interval_ms",
            SettingKey::StepIntervalDelayMs => "step_interval_delay_ms",
            SettingKey::Hooks => "hooks",
            SettingKey::InitialValue => "initial_value",
            SettingKey::ReplacementValueWhenEmpty => "replacement_value_when_empty",
        }
    }

    /// Parse a key from its snake_case name.
    pub fn from_text(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }
}

// ============================================================================
// Step divisibility
// ============================================================================

/// How a value is snapped onto the step grid.
///
/// Defaults to [`Round`](Self::Round).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StepDivisibility {
    /// Values are not snapped.
    None,
    /// Snap down to the grid.
    Floor,
    /// Snap to the nearest grid point.
    #[default]
    Round,
    /// Snap up to the grid.
    Ceil,
}

impl StepDivisibility {
    /// Returns the policy as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StepDivisibility::None => "none",
            StepDivisibility::Floor => "floor",
            StepDivisibility::Round => "round",
            StepDivisibility::Ceil => "ceil",
        }
    }

    /// Parse a policy from text (trimmed, case-insensitive).
    ///
    /// ```
    /// use rs_spinner::StepDivisibility;
    ///
    /// assert_eq!(StepDivisibility::from_text(" Floor "), Some(StepDivisibility::Floor));
    /// assert_eq!(StepDivisibility::from_text("sideways"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Some(StepDivisibility::None),
            "floor" => Some(StepDivisibility::Floor),
            "round" => Some(StepDivisibility::Round),
            "ceil" => Some(StepDivisibility::Ceil),
            _ => None,
        }
    }
}

// ============================================================================
// Raw (unsanitized) values
// ============================================================================

/// A loosely typed input value, as read from markup or JSON.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RawValue {
    /// Explicit null / undefined.
    Null,
    /// A number.
    Number(f64),
    /// Text, parsed with a single `.` decimal convention.
    Text(String),
}

impl RawValue {
    /// Coerce to a number; anything unparsable is NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            RawValue::Null => f64::NAN,
            RawValue::Number(n) => *n,
            RawValue::Text(s) => parse_number(s),
        }
    }

    /// Returns true for null and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Number(_) => false,
            RawValue::Text(s) => s.trim().is_empty(),
        }
    }
}

/// Parse trimmed text as a number, NaN if it is not one.
pub fn parse_number(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<f32> for RawValue {
    fn from(n: f32) -> Self {
        RawValue::Number(f64::from(n))
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Number(f64::from(n))
    }
}

impl From<u32> for RawValue {
    fn from(n: u32) -> Self {
        RawValue::Number(f64::from(n))
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<u64> for RawValue {
    fn from(n: u64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Null, Into::into)
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Effective spinner settings.
///
/// Always in a sanitized state: `step > 0`, and `min <= max` whenever both
/// are bounded. Mutate through [`Settings::apply`] with a patch from
/// [`sanitize`] to keep it that way.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Lower bound (`None` = unbounded).
    pub min: Option<f64>,
    /// Upper bound (`None` = unbounded).
    pub max: Option<f64>,
    /// Step quantum (always positive).
    pub step: f64,
    /// Fractional digits (at most [`MAX_DECIMALS`]).
    pub decimals: u32,
    /// Grid snapping policy.
    pub force_step_divisibility: StepDivisibility,
    /// Whether the step grows during a sustained spin.
    pub booster: bool,
    /// Number of spin ticks per doubling of the step.
    pub boost_every: u32,
    /// Cap on the boosted step (`None` = uncapped).
    pub max_boosted_step: Option<f64>,
    /// Interval between repeated steps while spinning.
    pub step_interval_ms: u64,
    /// Delay between the first step and repeated stepping.
    pub step_interval_delay_ms: u64,
    /// Text transform hooks.
    pub hooks: AnyHooks,
    /// Value written into an empty field at construction.
    pub initial_value: Option<f64>,
    /// Value substituted for empty or unparsable text.
    pub replacement_value_when_empty: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min: Some(0.0),
            max: Some(100.0),
            step: 1.0,
            decimals: 0,
            force_step_divisibility: StepDivisibility::Round,
            booster: true,
            boost_every: 10,
            max_boosted_step: None,
            step_interval_ms: 100,
            step_interval_delay_ms: 500,
            hooks: AnyHooks::identity(),
            initial_value: None,
            replacement_value_when_empty: None,
        }
    }
}

macro_rules! apply_field {
    ($settings:ident, $patch:ident, $changed:ident, $field:ident, $key:expr) => {
        if let Some(value) = $patch.$field {
            if $settings.$field != value {
                $settings.$field = value;
                let _ = $changed.push($key);
            }
        }
    };
}

impl Settings {
    /// Defaults with a patch applied.
    pub fn from_patch(patch: &SettingsPatch) -> Self {
        let mut settings = Self::default();
        let sanitized = sanitize(patch, &settings);
        settings.apply(sanitized);
        settings
    }

    /// Merge a sanitized patch in place.
    ///
    /// Returns the keys whose value actually changed.
    pub fn apply(&mut self, patch: SanitizedPatch) -> ChangedKeys {
        let mut changed = ChangedKeys::new();
        apply_field!(self, patch, changed, min, SettingKey::Min);
        apply_field!(self, patch, changed, max, SettingKey::Max);
        apply_field!(self, patch, changed, step, SettingKey::Step);
        apply_field!(self, patch, changed, decimals, SettingKey::Decimals);
        apply_field!(
            self,
            patch,
            changed,
            force_step_divisibility,
            SettingKey::ForceStepDivisibility
        );
        apply_field!(self, patch, changed, booster, SettingKey::Booster);
        apply_field!(self, patch, changed, boost_every, SettingKey::BoostEvery);
        apply_field!(
            self,
            patch,
            changed,
            max_boosted_step,
            SettingKey::MaxBoostedStep
        );
        apply_field!(
            self,
            patch,
            changed,
            step_interval_ms,
            SettingKey::StepIntervalMs
        );
        apply_field!(
            self,
            patch,
            changed,
            step_interval_delay_ms,
            SettingKey::StepIntervalDelayMs
        );
        apply_field!(self, patch, changed, hooks, SettingKey::Hooks);
        apply_field!(self, patch, changed, initial_value, SettingKey::InitialValue);
        apply_field!(
            self,
            patch,
            changed,
            replacement_value_when_empty,
            SettingKey::ReplacementValueWhenEmpty
        );
        changed
    }
}

// ============================================================================
// Patches
// ============================================================================

/// A partial, unsanitized configuration update.
///
/// Only keys that are `Some` are considered. Build with the `with_*`
/// methods:
///
/// ```rust
/// use rs_spinner::SettingsPatch;
///
/// let patch = SettingsPatch::new()
///     .with_min(-10)
///     .with_max("10")
///     .with_step(0.5)
///     .with_decimals(1);
/// assert!(!patch.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SettingsPatch {
    /// Lower bound; blank or non-finite means unbounded.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "present"))]
    pub min: Option<RawValue>,
    /// Upper bound; blank or non-finite means unbounded.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "present"))]
    pub max: Option<RawValue>,
    /// Step quantum.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "present"))]
    pub step: Option<RawValue>,
    /// Fractional digits.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "present"))]
    pub decimals: Option<RawValue>,
    /// Grid snapping policy.
    #[cfg_attr(feature = "serde", serde(alias = "forcestepdivisibility"))]
    pub force_step_divisibility: Option<StepDivisibility>,
    /// Spin acceleration on/off.
    pub booster: Option<bool>,
    /// Ticks per doubling of the boosted step.
    #[cfg_attr(
        feature = "serde",
        serde(alias = "boostat", deserialize_with = "present")
    )]
    pub boost_every: Option<RawValue>,
    /// Cap on the boosted step; blank means uncapped.
    #[cfg_attr(
        feature = "serde",
        serde(alias = "maxboostedstep", deserialize_with = "present")
    )]
    pub max_boosted_step: Option<RawValue>,
    /// Interval between repeated steps.
    #[cfg_attr(
        feature = "serde",
        serde(alias = "stepinterval", deserialize_with = "present")
    )]
    pub step_interval_ms: Option<RawValue>,
    /// Delay before repeated stepping begins.
    #[cfg_attr(
        feature = "serde",
        serde(alias = "stepintervaldelay", deserialize_with = "present")
    )]
    pub step_interval_delay_ms: Option<RawValue>,
    /// Text transform hooks.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub hooks: Option<AnyHooks>,
    /// Value for an empty field at construction.
    #[cfg_attr(
        feature = "serde",
        serde(alias = "initval", deserialize_with = "present")
    )]
    pub initial_value: Option<RawValue>,
    /// Value substituted for empty or unparsable text.
    #[cfg_attr(
        feature = "serde",
        serde(alias = "replacementval", deserialize_with = "present")
    )]
    pub replacement_value_when_empty: Option<RawValue>,
}

/// Keeps an explicit JSON `null` as `Some(RawValue::Null)` instead of "absent".
#[cfg(feature = "serde")]
fn present<'de, D>(deserializer: D) -> Result<Option<RawValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    <RawValue as serde::Deserialize>::deserialize(deserializer).map(Some)
}

impl SettingsPatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lower bound
    pub fn with_min(mut self, min: impl Into<RawValue>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Set the upper bound
    pub fn with_max(mut self, max: impl Into<RawValue>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Remove the lower bound
    pub fn with_min_unbounded(mut self) -> Self {
        self.min = Some(RawValue::Null);
        self
    }

    /// Remove the upper bound
    pub fn with_max_unbounded(mut self) -> Self {
        self.max = Some(RawValue::Null);
        self
    }

    /// Set the step
    pub fn with_step(mut self, step: impl Into<RawValue>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Set the number of decimals
    pub fn with_decimals(mut self, decimals: impl Into<RawValue>) -> Self {
        self.decimals = Some(decimals.into());
        self
    }

    /// Set the snapping policy
    pub fn with_force_step_divisibility(mut self, policy: StepDivisibility) -> Self {
        self.force_step_divisibility = Some(policy);
        self
    }

    /// Enable or disable the booster
    pub fn with_booster(mut self, booster: bool) -> Self {
        self.booster = Some(booster);
        self
    }

    /// Set ticks per step doubling
    pub fn with_boost_every(mut self, every: impl Into<RawValue>) -> Self {
        self.boost_every = Some(every.into());
        self
    }

    /// Cap the boosted step
    pub fn with_max_boosted_step(mut self, cap: impl Into<RawValue>) -> Self {
        self.max_boosted_step = Some(cap.into());
        self
    }

    /// Set the repeat interval
    pub fn with_step_interval_ms(mut self, ms: impl Into<RawValue>) -> Self {
        self.step_interval_ms = Some(ms.into());
        self
    }

    /// Set the delay before repeating
    pub fn with_step_interval_delay_ms(mut self, ms: impl Into<RawValue>) -> Self {
        self.step_interval_delay_ms = Some(ms.into());
        self
    }

    /// Set the transform hooks
    pub fn with_hooks(mut self, hooks: AnyHooks) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Set the initial value
    pub fn with_initial_value(mut self, value: impl Into<RawValue>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    /// Set the value used when the field is empty
    pub fn with_replacement_value_when_empty(mut self, value: impl Into<RawValue>) -> Self {
        self.replacement_value_when_empty = Some(value.into());
        self
    }

    /// Returns true if no key is present.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A patch of sanitized values, ready for [`Settings::apply`].
///
/// The outer `Option` means "key present"; for bounds and optional values the
/// inner `Option` is the value itself (`None` = unbounded / unset).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SanitizedPatch {
    /// Lower bound.
    pub min: Option<Option<f64>>,
    /// Upper bound.
    pub max: Option<Option<f64>>,
    /// Step quantum.
    pub step: Option<f64>,
    /// Fractional digits.
    pub decimals: Option<u32>,
    /// Grid snapping policy.
    pub force_step_divisibility: Option<StepDivisibility>,
    /// Booster flag.
    pub booster: Option<bool>,
    /// Ticks per doubling.
    pub boost_every: Option<u32>,
    /// Boost cap.
    pub max_boosted_step: Option<Option<f64>>,
    /// Repeat interval.
    pub step_interval_ms: Option<u64>,
    /// Repeat delay.
    pub step_interval_delay_ms: Option<u64>,
    /// Transform hooks.
    pub hooks: Option<AnyHooks>,
    /// Initial value.
    pub initial_value: Option<Option<f64>>,
    /// Replacement value.
    pub replacement_value_when_empty: Option<Option<f64>>,
}

// ============================================================================
// Sanitizer
// ============================================================================

fn coerce_bound(raw: &RawValue) -> Option<f64> {
    if raw.is_blank() {
        return None;
    }
    let value = raw.to_number();
    value.is_finite().then_some(value)
}

fn coerce_millis(raw: &RawValue, fallback: u64, key: SettingKey) -> u64 {
    let value = raw.to_number();
    if value.is_finite() && value >= 0.0 {
        value.floor() as u64
    } else {
        log::debug!(target: "spinner.settings", "invalid {} {:?}, keeping {}", key.as_str(), raw, fallback);
        fallback
    }
}

/// Coerce the keys present in `patch` into safe values.
///
/// `current` supplies the fallbacks for timing and boost keys and the
/// other side of the range when a patch carries only one bound. The function
/// is pure: identical inputs give identical output.
pub fn sanitize(patch: &SettingsPatch, current: &Settings) -> SanitizedPatch {
    let mut out = SanitizedPatch::default();

    if let Some(raw) = &patch.step {
        let step = raw.to_number();
        out.step = Some(if step.is_finite() && step > 0.0 {
            step
        } else {
            log::debug!(target: "spinner.settings", "invalid step {:?}, using 1", raw);
            1.0
        });
    }

    if let Some(raw) = &patch.decimals {
        let decimals = raw.to_number();
        out.decimals = Some(if decimals.is_finite() && decimals >= 0.0 {
            if decimals > f64::from(MAX_DECIMALS) {
                log::debug!(
                    target: "spinner.settings",
                    "decimals {:?} too large, using {}",
                    raw,
                    MAX_DECIMALS
                );
                MAX_DECIMALS
            } else {
                decimals.floor() as u32
            }
        } else {
            log::debug!(target: "spinner.settings", "invalid decimals {:?}, using 0", raw);
            0
        });
    }

    if let Some(raw) = &patch.min {
        out.min = Some(coerce_bound(raw));
    }
    if let Some(raw) = &patch.max {
        out.max = Some(coerce_bound(raw));
    }
    if out.min.is_some() || out.max.is_some() {
        let min = out.min.unwrap_or(current.min);
        let max = out.max.unwrap_or(current.max);
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                log::debug!(target: "spinner.settings", "min {} > max {}, swapping", lo, hi);
                out.min = Some(Some(hi));
                out.max = Some(Some(lo));
            }
        }
    }

    if let Some(raw) = &patch.step_interval_ms {
        out.step_interval_ms = Some(coerce_millis(
            raw,
            current.step_interval_ms,
            SettingKey::StepIntervalMs,
        ));
    }
    if let Some(raw) = &patch.step_interval_delay_ms {
        out.step_interval_delay_ms = Some(coerce_millis(
            raw,
            current.step_interval_delay_ms,
            SettingKey::StepIntervalDelayMs,
        ));
    }

    if let Some(raw) = &patch.boost_every {
        let every = raw.to_number();
        out.boost_every = Some(if every.is_finite() && every >= 1.0 {
            every.floor().min(f64::from(u32::MAX)) as u32
        } else {
            current.boost_every
        });
    }

    if let Some(raw) = &patch.max_boosted_step {
        out.max_boosted_step = Some(coerce_bound(raw).filter(|cap| *cap > 0.0));
    }

    if let Some(raw) = &patch.initial_value {
        out.initial_value = Some(coerce_bound(raw));
    }
    if let Some(raw) = &patch.replacement_value_when_empty {
        out.replacement_value_when_empty = Some(coerce_bound(raw));
    }

    out.force_step_divisibility = patch.force_step_divisibility;
    out.booster = patch.booster;
    out.hooks = patch.hooks.clone();

    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize_default(patch: &SettingsPatch) -> SanitizedPatch {
        sanitize(patch, &Settings::default())
    }

    // =========================================================================
    // Step / decimals
    // =========================================================================

    #[test]
    fn step_zero_becomes_one() {
        let out = sanitize_default(&SettingsPatch::new().with_step(0));
        assert_eq!(out.step, Some(1.0));
    }

    #[test]
    fn step_negative_or_garbage_becomes_one() {
        assert_eq!(sanitize_default(&SettingsPatch::new().with_step(-2)).step, Some(1.0));
        assert_eq!(sanitize_default(&SettingsPatch::new().with_step("abc")).step, Some(1.0));
        assert_eq!(sanitize_default(&SettingsPatch::new().with_step(f64::INFINITY)).step, Some(1.0));
    }

    #[test]
    fn step_text_is_coerced() {
        let out = sanitize_default(&SettingsPatch::new().with_step(" 0.25 "));
        assert_eq!(out.step, Some(0.25));
    }

    #[test]
    fn decimals_floored() {
        let out = sanitize_default(&SettingsPatch::new().with_decimals(2.7));
        assert_eq!(out.decimals, Some(2));
    }

    #[test]
    fn decimals_capped() {
        let out = sanitize_default(&SettingsPatch::new().with_decimals(70000));
        assert_eq!(out.decimals, Some(MAX_DECIMALS));
        let out = sanitize_default(&SettingsPatch::new().with_decimals(f64::MAX));
        assert_eq!(out.decimals, Some(MAX_DECIMALS));
        let out = sanitize_default(&SettingsPatch::new().with_decimals(MAX_DECIMALS));
        assert_eq!(out.decimals, Some(MAX_DECIMALS));
    }

    #[test]
    fn decimals_invalid_becomes_zero() {
        assert_eq!(sanitize_default(&SettingsPatch::new().with_decimals(-1)).decimals, Some(0));
        assert_eq!(sanitize_default(&SettingsPatch::new().with_decimals(f64::NAN)).decimals, Some(0));
    }

    // =========================================================================
    // Bounds
    // =========================================================================

    #[test]
    fn blank_bounds_are_unbounded() {
        let out = sanitize_default(&SettingsPatch::new().with_min("").with_max(RawValue::Null));
        assert_eq!(out.min, Some(None));
        assert_eq!(out.max, Some(None));
    }

    #[test]
    fn non_finite_bounds_are_unbounded() {
        let out = sanitize_default(
            &SettingsPatch::new()
                .with_min(f64::NEG_INFINITY)
                .with_max("nope"),
        );
        assert_eq!(out.min, Some(None));
        assert_eq!(out.max, Some(None));
    }

    #[test]
    fn inverted_bounds_swapped() {
        let out = sanitize_default(&SettingsPatch::new().with_min(100).with_max(50));
        assert_eq!(out.min, Some(Some(50.0)));
        assert_eq!(out.max, Some(Some(100.0)));
    }

    #[test]
    fn single_bound_compared_against_current_other_side() {
        let current = Settings {
            max: Some(50.0),
            ..Settings::default()
        };
        let out = sanitize(&SettingsPatch::new().with_min(80), &current);
        assert_eq!(out.min, Some(Some(50.0)));
        assert_eq!(out.max, Some(Some(80.0)));
    }

    #[test]
    fn absent_bounds_untouched() {
        let out = sanitize_default(&SettingsPatch::new().with_step(2));
        assert_eq!(out.min, None);
        assert_eq!(out.max, None);
    }

    // =========================================================================
    // Timing and boost
    // =========================================================================

    #[test]
    fn invalid_interval_keeps_supplied_default() {
        let current = Settings {
            step_interval_ms: 42,
            step_interval_delay_ms: 900,
            ..Settings::default()
        };
        let patch = SettingsPatch::new()
            .with_step_interval_ms(-5)
            .with_step_interval_delay_ms("soon");
        let out = sanitize(&patch, &current);
        assert_eq!(out.step_interval_ms, Some(42));
        assert_eq!(out.step_interval_delay_ms, Some(900));
    }

    #[test]
    fn valid_interval_floored() {
        let out = sanitize_default(&SettingsPatch::new().with_step_interval_ms(33.9));
        assert_eq!(out.step_interval_ms, Some(33));
    }

    #[test]
    fn zero_interval_allowed() {
        let out = sanitize_default(&SettingsPatch::new().with_step_interval_ms(0));
        assert_eq!(out.step_interval_ms, Some(0));
    }

    #[test]
    fn boost_every_invalid_keeps_current() {
        let out = sanitize_default(&SettingsPatch::new().with_boost_every(0));
        assert_eq!(out.boost_every, Some(10));
    }

    #[test]
    fn max_boosted_step_blank_or_nonpositive_uncapped() {
        assert_eq!(
            sanitize_default(&SettingsPatch::new().with_max_boosted_step("")).max_boosted_step,
            Some(None)
        );
        assert_eq!(
            sanitize_default(&SettingsPatch::new().with_max_boosted_step(-3)).max_boosted_step,
            Some(None)
        );
        assert_eq!(
            sanitize_default(&SettingsPatch::new().with_max_boosted_step(8)).max_boosted_step,
            Some(Some(8.0))
        );
    }

    #[test]
    fn replacement_value_coerced() {
        let out = sanitize_default(
            &SettingsPatch::new()
                .with_replacement_value_when_empty("7")
                .with_initial_value("x"),
        );
        assert_eq!(out.replacement_value_when_empty, Some(Some(7.0)));
        assert_eq!(out.initial_value, Some(None));
    }

    // =========================================================================
    // Purity and apply
    // =========================================================================

    #[test]
    fn sanitize_is_referentially_transparent() {
        let current = Settings::default();
        let patch = SettingsPatch::new()
            .with_min("9")
            .with_max(3)
            .with_step(-1)
            .with_decimals(2.5)
            .with_step_interval_ms("bad")
            .with_force_step_divisibility(StepDivisibility::Ceil);
        let first = sanitize(&patch, &current);
        let second = sanitize(&patch, &current);
        assert_eq!(first, second);
        assert_eq!(current, Settings::default());
    }

    #[test]
    fn apply_reports_only_changed_keys() {
        let mut settings = Settings::default();
        let patch = SettingsPatch::new().with_min(0).with_max(10).with_step(1);
        let changed = settings.apply(sanitize(&patch, &settings));
        assert_eq!(changed.as_slice(), &[SettingKey::Max]);
    }

    #[test]
    fn apply_same_patch_twice_second_is_noop() {
        let mut settings = Settings::default();
        let patch = SettingsPatch::new().with_step(5).with_decimals(1);
        let first = settings.apply(sanitize(&patch, &settings));
        let second = settings.apply(sanitize(&patch, &settings));
        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
    }

    #[test]
    fn sanitized_settings_keep_min_le_max() {
        let patches = [
            SettingsPatch::new().with_min(100).with_max(50),
            SettingsPatch::new().with_min(500),
            SettingsPatch::new().with_max(-20),
            SettingsPatch::new().with_min("").with_max(-5),
        ];
        for patch in &patches {
            let settings = Settings::from_patch(patch);
            if let (Some(min), Some(max)) = (settings.min, settings.max) {
                assert!(min <= max, "{patch:?} gave min {min} > max {max}");
            }
        }
    }

    // =========================================================================
    // Keys and raw values
    // =========================================================================

    #[test]
    fn setting_key_round_trips_through_text() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::from_text(key.as_str()), Some(key));
        }
        assert_eq!(SettingKey::from_text("colour"), None);
    }

    #[test]
    fn raw_value_conversions() {
        assert_eq!(RawValue::from(3), RawValue::Number(3.0));
        assert_eq!(RawValue::from("x"), RawValue::Text("x".into()));
        assert_eq!(RawValue::from(None::<f64>), RawValue::Null);
        assert_eq!(RawValue::from(Some(2.5)), RawValue::Number(2.5));
        assert!(RawValue::Text("   ".into()).is_blank());
        assert!(RawValue::Text("abc".into()).to_number().is_nan());
    }

    #[test]
    fn patch_is_empty() {
        assert!(SettingsPatch::new().is_empty());
        assert!(!SettingsPatch::new().with_booster(false).is_empty());
    }
}
