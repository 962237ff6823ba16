//! Settings patches derived from field attributes.
//!
//! Adapters configure a spinner from markup: the native `min`, `max`, and
//! `step` attributes, plus `data-bts-*` attributes for everything else. The
//! `data-bts-*` form wins when both are present.
//!
//! | Attribute | Setting |
//! |-----------|---------|
//! | `min`, `data-bts-min` | `min` |
//! | `max`, `data-bts-max` | `max` |
//! | `step`, `data-bts-step` | `step` |
//! | `data-bts-decimals` | `decimals` |
//! | `data-bts-force-step-divisibility` | `force_step_divisibility` |
//! | `data-bts-booster` | `booster` |
//! | `data-bts-boostat` | `boost_every` |
//! | `data-bts-max-boosted-step` | `max_boosted_step` |
//! | `data-bts-step-interval` | `step_interval_ms` |
//! | `data-bts-step-interval-delay` | `step_interval_delay_ms` |
//! | `data-bts-init-val` | `initial_value` |
//! | `data-bts-replacement-val` | `replacement_value_when_empty` |
//!
//! # Example
//!
//! ```rust
//! use rs_spinner::attributes::patch_from_field;
//! use rs_spinner::hal::MockField;
//!
//! let field = MockField::new("")
//!     .with_attribute("max", "10")
//!     .with_attribute("data-bts-max", "20")
//!     .with_attribute("data-bts-decimals", "2");
//!
//! let patch = patch_from_field(&field);
//! assert_eq!(patch.max, Some("20".into()));
//! assert_eq!(patch.decimals, Some("2".into()));
//! ```

use crate::settings::{RawValue, SettingKey, SettingsPatch, StepDivisibility};
use crate::traits::HostField;

/// Native attribute names and their settings.
const NATIVE: [(&str, SettingKey); 3] = [
    ("min", SettingKey::Min),
    ("max", SettingKey::Max),
    ("step", SettingKey::Step),
];

/// `data-bts-*` attribute names and their settings.
const DATA: [(&str, SettingKey); 12] = [
    ("data-bts-min", SettingKey::Min),
    ("data-bts-max", SettingKey::Max),
    ("data-bts-step", SettingKey::Step),
    ("data-bts-decimals", SettingKey::Decimals),
    (
        "data-bts-force-step-divisibility",
        SettingKey::ForceStepDivisibility,
    ),
    ("data-bts-booster", SettingKey::Booster),
    ("data-bts-boostat", SettingKey::BoostEvery),
    ("data-bts-max-boosted-step", SettingKey::MaxBoostedStep),
    ("data-bts-step-interval", SettingKey::StepIntervalMs),
    ("data-bts-step-interval-delay", SettingKey::StepIntervalDelayMs),
    ("data-bts-init-val", SettingKey::InitialValue),
    ("data-bts-replacement-val", SettingKey::ReplacementValueWhenEmpty),
];

/// Setting controlled by an attribute name, if any.
///
/// ```
/// use rs_spinner::attributes::setting_for_attribute;
/// use rs_spinner::SettingKey;
///
/// assert_eq!(setting_for_attribute("step"), Some(SettingKey::Step));
/// assert_eq!(setting_for_attribute("data-bts-boostat"), Some(SettingKey::BoostEvery));
/// assert_eq!(setting_for_attribute("class"), None);
/// ```
pub fn setting_for_attribute(name: &str) -> Option<SettingKey> {
    let name = name.trim().to_ascii_lowercase();
    NATIVE
        .iter()
        .chain(DATA.iter())
        .find(|(attribute, _)| *attribute == name)
        .map(|(_, key)| *key)
}

/// Build a patch from an attribute lookup.
///
/// Attributes that are absent are left out of the patch; present ones are
/// passed through as text for the sanitizer to coerce.
pub fn patch_from_attributes<L>(lookup: L) -> SettingsPatch
where
    L: Fn(&str) -> Option<String>,
{
    let mut patch = SettingsPatch::new();
    // Native first so data-bts-* overrides
    for (name, key) in NATIVE.iter().chain(DATA.iter()) {
        if let Some(value) = lookup(*name) {
            set_from_text(&mut patch, *key, &value);
        }
    }
    patch
}

/// Build a patch from a field's attributes.
pub fn patch_from_field<F: HostField>(field: &F) -> SettingsPatch {
    patch_from_attributes(|name| field.attribute(name))
}

/// Patch for a single attribute change seen by an attribute watcher.
///
/// `None` value means the attribute was removed. Returns `None` for
/// attributes that do not control a setting.
pub fn patch_from_attribute_change(name: &str, value: Option<&str>) -> Option<SettingsPatch> {
    let key = setting_for_attribute(name)?;
    let mut patch = SettingsPatch::new();
    match value {
        Some(text) => set_from_text(&mut patch, key, text),
        None => set_raw(&mut patch, key, RawValue::Null),
    }
    Some(patch)
}

fn set_from_text(patch: &mut SettingsPatch, key: SettingKey, text: &str) {
    match key {
        SettingKey::ForceStepDivisibility => {
            patch.force_step_divisibility = StepDivisibility::from_text(text);
        }
        SettingKey::Booster => patch.booster = parse_flag(text),
        _ => set_raw(patch, key, RawValue::from(text)),
    }
}

fn set_raw(patch: &mut SettingsPatch, key: SettingKey, value: RawValue) {
    let slot = match key {
        SettingKey::Min => &mut patch.min,
        SettingKey::Max => &mut patch.max,
        SettingKey::Step => &mut patch.step,
        SettingKey::Decimals => &mut patch.decimals,
        SettingKey::BoostEvery => &mut patch.boost_every,
        SettingKey::MaxBoostedStep => &mut patch.max_boosted_step,
        SettingKey::StepIntervalMs => &mut patch.step_interval_ms,
        SettingKey::StepIntervalDelayMs => &mut patch.step_interval_delay_ms,
        SettingKey::InitialValue => &mut patch.initial_value,
        SettingKey::ReplacementValueWhenEmpty => &mut patch.replacement_value_when_empty,
        SettingKey::ForceStepDivisibility | SettingKey::Booster | SettingKey::Hooks => return,
    };
    *slot = Some(value);
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
