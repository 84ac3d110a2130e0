//! Engine configuration

use serde::{Deserialize, Serialize};
use crate::number::{DEFAULT_DISPLAY_DIGITS, MAX_DISPLAY_DIGITS};

/// Presentation and tolerance settings shared by the resolver and reconciler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fractional digits kept in display strings (trailing zeros stripped)
    pub display_fraction_digits: u32,
    /// Relative tolerance for round-trip checks
    pub round_trip_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            display_fraction_digits: DEFAULT_DISPLAY_DIGITS,
            round_trip_tolerance: 1e-9,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values above `MAX_DISPLAY_DIGITS` are clamped
    pub fn with_display_digits(mut self, digits: u32) -> Self {
        self.display_fraction_digits = digits.min(MAX_DISPLAY_DIGITS);
        self
    }

    pub fn with_round_trip_tolerance(mut self, tolerance: f64) -> Self {
        self.round_trip_tolerance = tolerance;
        self
    }

    /// Load from a JSON document; missing keys keep their defaults.
    ///
    /// An oversized `display_fraction_digits` is clamped to `MAX_DISPLAY_DIGITS`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        let digits = config.display_fraction_digits;
        Ok(config.with_display_digits(digits))
    }
}
