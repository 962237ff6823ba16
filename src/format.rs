//! Display formatting: numbers to field text and back.
//!
//! Formatting writes exactly `decimals` fractional digits and then runs the
//! `after_calc` hook. Parsing runs `before_calc`, trims, and reads a number
//! with `.` as the decimal separator; anything else is NaN.

use crate::settings::{parse_number, Settings, MAX_DECIMALS};

/// Format `value` as field text.
///
/// ```
/// use rs_spinner::format::format_value;
/// use rs_spinner::{Settings, SettingsPatch};
///
/// let settings = Settings::from_patch(&SettingsPatch::new().with_decimals(2));
/// assert_eq!(format_value(0.1, &settings), "0.10");
/// ```
pub fn format_value(value: f64, settings: &Settings) -> String {
    let decimals = settings.decimals.min(MAX_DECIMALS) as usize;
    let text = format!("{value:.decimals$}");
    settings.hooks.after_calc(&text)
}

/// Parse field text into a number (NaN if it is not one).
pub fn parse_value(text: &str, settings: &Settings) -> f64 {
    let text = settings.hooks.before_calc(text);
    parse_number(&text)
}
