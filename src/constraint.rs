//! Value constraints: quantization, decimal rounding, bounds, and the
//! boosted step.
//!
//! Every value the engine writes to the field passes through
//! [`apply_constraints`], in this order:
//!
//! 1. Snap onto the step grid per [`StepDivisibility`]
//! 2. Round to `decimals` fractional digits
//! 3. Normalize `-0` to `0`
//! 4. Clamp to `[min, max]` (each side only when bounded)
//!
//! # Example
//!
//! ```rust
//! use rs_spinner::constraint::{apply_constraints, next_value};
//! use rs_spinner::{Direction, Settings, SettingsPatch};
//!
//! let settings = Settings::from_patch(&SettingsPatch::new().with_step(3).with_max(10));
//!
//! assert_eq!(apply_constraints(10.0, &settings), 9.0);   // snapped
//! assert_eq!(next_value(9.0, Direction::Up, 0, &settings), 10.0); // clamped
//! ```

use crate::settings::{Settings, StepDivisibility};
use crate::spin::Direction;

/// Quotients this close to an integer are treated as that integer.
const GRID_EPSILON: f64 = 1e-9;

/// Snap `value` onto multiples of `step`.
///
/// A non-positive or non-finite step leaves the value unchanged.
pub fn quantize(value: f64, step: f64, policy: StepDivisibility) -> f64 {
    if !(step.is_finite() && step > 0.0) || !value.is_finite() {
        return value;
    }
    let ratio = value / step;
    let nearest = ratio.round();
    let ratio = if (ratio - nearest).abs() < GRID_EPSILON {
        nearest
    } else {
        ratio
    };
    match policy {
        StepDivisibility::None => value,
        StepDivisibility::Floor => ratio.floor() * step,
        StepDivisibility::Round => ratio.round() * step,
        StepDivisibility::Ceil => ratio.ceil() * step,
    }
}

/// Round `value` to `decimals` fractional digits (half away from zero).
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || !factor.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Clamp to the bounds that are set, min first.
pub fn clamp_to_bounds(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let mut value = value;
    if let Some(min) = min {
        if value < min {
            value = min;
        }
    }
    if let Some(max) = max {
        if value > max {
            value = max;
        }
    }
    value
}

/// Quantize, round, normalize, and clamp a candidate value.
///
/// NaN passes through unchanged; callers decide how to recover.
pub fn apply_constraints(value: f64, settings: &Settings) -> f64 {
    if value.is_nan() {
        return value;
    }
    let value = quantize(value, settings.step, settings.force_step_divisibility);
    let value = round_to_decimals(value, settings.decimals);
    // -0 would format as "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    clamp_to_bounds(value, settings.min, settings.max)
}

/// The value a spinner falls back to when its text is not a number.
///
/// The replacement value if configured, otherwise the range midpoint (the
/// one bounded side, or `0` when unbounded), constrained.
pub fn recovery_value(settings: &Settings) -> f64 {
    let raw = settings
        .replacement_value_when_empty
        .unwrap_or(match (settings.min, settings.max) {
            (Some(min), Some(max)) => (min + max) / 2.0,
            (Some(min), None) => min,
            (None, Some(max)) => max,
            (None, None) => 0.0,
        });
    apply_constraints(raw, settings)
}

/// Step size after `step_count` spin ticks, before any cap.
///
/// Doubles every `boost_every` ticks while the booster is on, saturating at
/// `f64::MAX`.
pub fn boosted_step(settings: &Settings, step_count: u32) -> f64 {
    if !settings.booster {
        return settings.step;
    }
    let doublings = step_count / settings.boost_every.max(1);
    let step = settings.step * 2f64.powi(doublings.min(1023) as i32);
    if step.is_finite() {
        step
    } else {
        f64::MAX
    }
}

/// Returns true if `value` is at (or past) the bound in `direction`.
pub fn is_at_bound(value: f64, direction: Direction, settings: &Settings) -> bool {
    match direction {
        Direction::Up => settings.max.map_or(false, |max| value >= max),
        Direction::Down => settings.min.map_or(false, |min| value <= min),
    }
}

/// Compute the value one step from `current` in `direction`.
///
/// A NaN `current` yields [`recovery_value`] without stepping. When the
/// boosted step exceeds `max_boosted_step`, the cap becomes the step (never
/// below the base step) and `current` is first re-aligned to that grid.
/// A step that would overflow leaves `current` unchanged.
pub fn next_value(current: f64, direction: Direction, step_count: u32, settings: &Settings) -> f64 {
    if current.is_nan() {
        return recovery_value(settings);
    }

    let mut value = current;
    let mut step = boosted_step(settings, step_count);
    if let Some(cap) = settings.max_boosted_step {
        if step > cap {
            step = cap.max(settings.step);
            value = (value / step).round() * step;
        }
    }

    let candidate = match direction {
        Direction::Up => value + step,
        Direction::Down => value - step,
    };
    let next = apply_constraints(candidate, settings);
    if next.is_finite() {
        next
    } else {
        log::debug!(target: "spinner.spin", "step from {} overflows, holding", current);
        current
    }
}
