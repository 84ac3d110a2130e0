//! Quantity validation and display formatting
//!
//! Quantities are plain `f64`. The raw value is what gets stored; the
//! formatted string is only for presentation, so repeated conversions never
//! compound display rounding.

use crate::ConversionError;

/// Fractional digits shown by default
pub const DEFAULT_DISPLAY_DIGITS: u32 = 6;

/// Most fractional digits an `f64` can meaningfully show
pub const MAX_DISPLAY_DIGITS: u32 = 17;

/// Accept only finite, non-negative quantities
pub fn validate_quantity(quantity: f64) -> Result<f64, ConversionError> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(ConversionError::InvalidQuantity(quantity));
    }
    Ok(quantity)
}

/// Round to `digits` fractional places and strip trailing zeros.
///
/// `0.25` renders as `"0.25"`, `400.0` as `"400"`, `1.0 / 3.0` as `"0.333333"`.
/// `digits` above `MAX_DISPLAY_DIGITS` is clamped.
pub fn format_quantity(raw: f64, digits: u32) -> String {
    let digits = digits.min(MAX_DISPLAY_DIGITS);
    let fixed = format!("{:.prec$}", raw, prec = digits as usize);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };

    // "-0" after rounding a tiny negative or a negative zero
    if trimmed == "-0" {
        return "0".to_string();
    }
    trimmed.to_string()
}
