//! Quantity resolution across a single conversion rule

use serde::Serialize;
use aerounit_core::{
    format_quantity, validate_quantity, ConversionError, ConversionRule, Direction, EngineConfig, RuleId, UnitId,
};
use tracing::debug;

/// A quantity expressed on one side of a rule
#[derive(Debug, Clone, Copy)]
pub struct ConversionQuery<'a> {
    pub rule: &'a ConversionRule,
    pub direction: Direction,
    pub input_quantity: f64,
}

impl<'a> ConversionQuery<'a> {
    pub fn new(rule: &'a ConversionRule, direction: Direction, input_quantity: f64) -> Self {
        Self { rule, direction, input_quantity }
    }

    /// Quantity counted in the rule's secondary unit
    pub fn secondary_to_primary(rule: &'a ConversionRule, input_quantity: f64) -> Self {
        Self::new(rule, Direction::SecondaryToPrimary, input_quantity)
    }

    /// Quantity counted in the rule's primary unit
    pub fn primary_to_secondary(rule: &'a ConversionRule, input_quantity: f64) -> Self {
        Self::new(rule, Direction::PrimaryToSecondary, input_quantity)
    }
}

/// Outcome of a resolution.
///
/// `raw` is the value to store or submit. `display` is rounded for the form
/// and must never be parsed back into a stored quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub rule_id: RuleId,
    pub direction: Direction,
    pub input_quantity: f64,
    pub from_unit: UnitId,
    pub to_unit: UnitId,
    pub raw: f64,
    pub display: String,
}

/// Stateless translator between the two sides of a rule
#[derive(Debug, Clone, Default)]
pub struct ConversionResolver {
    config: EngineConfig,
}

impl ConversionResolver {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn resolve(&self, query: &ConversionQuery<'_>) -> Result<ConversionResult, ConversionError> {
        let rule = query.rule;
        let input = validate_quantity(query.input_quantity)?;

        // The registry indexes invalid rules; they are rejected here
        rule.validate()?;

        let raw = match query.direction {
            Direction::SecondaryToPrimary => input / rule.equivalence,
            Direction::PrimaryToSecondary => input * rule.equivalence,
        };
        if !raw.is_finite() {
            return Err(ConversionError::InvalidQuantity(input));
        }

        let display = format_quantity(raw, self.config.display_fraction_digits);
        debug!(rule = %rule.id, direction = ?query.direction, input, raw, "resolved quantity");

        Ok(ConversionResult {
            rule_id: rule.id.clone(),
            direction: query.direction,
            input_quantity: input,
            from_unit: rule.source_unit(query.direction).clone(),
            to_unit: rule.target_unit(query.direction).clone(),
            raw,
            display,
        })
    }

    /// Convert forth and back, checking the quantity survives within tolerance
    pub fn round_trip_holds(&self, rule: &ConversionRule, direction: Direction, quantity: f64) -> Result<bool, ConversionError> {
        let there = self.resolve(&ConversionQuery::new(rule, direction, quantity))?;
        let back = self.resolve(&ConversionQuery::new(rule, direction.reversed(), there.raw))?;
        let scale = quantity.abs().max(1.0);
        Ok((back.raw - quantity).abs() <= self.config.round_trip_tolerance * scale)
    }
}

/// Resolve with the default configuration
pub fn resolve(query: &ConversionQuery<'_>) -> Result<ConversionResult, ConversionError> {
    ConversionResolver::default().resolve(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn drum_to_liter() -> ConversionRule {
        ConversionRule::new("drum_l", "DRUM", "LITER", 200.0)
    }

    #[test]
    fn test_liters_received_into_drums() {
        let rule = drum_to_liter();
        let result = resolve(&ConversionQuery::secondary_to_primary(&rule, 50.0)).unwrap();
        assert_eq!(result.raw, 0.25);
        assert_eq!(result.display, "0.25");
        assert_eq!(result.from_unit.as_str(), "LITER");
        assert_eq!(result.to_unit.as_str(), "DRUM");
    }

    #[test]
    fn test_drums_into_liters() {
        let rule = drum_to_liter();
        let result = resolve(&ConversionQuery::primary_to_secondary(&rule, 2.0)).unwrap();
        assert_eq!(result.raw, 400.0);
        assert_eq!(result.display, "400");
        assert_eq!(result.to_unit.as_str(), "LITER");
    }

    #[test]
    fn test_secondary_to_primary_divides() {
        for eq in [12.0, 4.0, 3.785, 0.5, 1e-3] {
            let rule = ConversionRule::new("r", "P", "S", eq);
            for q in [0.0, 1.0, 7.0, 123.456, 1e6] {
                let result = resolve(&ConversionQuery::secondary_to_primary(&rule, q)).unwrap();
                assert_eq!(result.raw, q / eq);
            }
        }
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let resolver = ConversionResolver::default();
        for eq in [12.0, 3.0, 3.785411784, 0.0283495, 7.0] {
            let rule = ConversionRule::new("r", "P", "S", eq);
            for q in [0.1, 1.0, 10.0 / 3.0, 999.999, 48.0] {
                assert!(resolver.round_trip_holds(&rule, Direction::SecondaryToPrimary, q).unwrap());
                assert!(resolver.round_trip_holds(&rule, Direction::PrimaryToSecondary, q).unwrap());
            }
        }
    }

    #[test]
    fn test_display_keeps_raw_precision() {
        let rule = ConversionRule::new("dozen", "DOZEN", "UNIT", 12.0);
        let result = resolve(&ConversionQuery::secondary_to_primary(&rule, 1.0)).unwrap();
        assert_eq!(result.display, "0.083333");
        assert_eq!(result.raw, 1.0 / 12.0);
        assert_ne!(result.raw, 0.083333);
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        let rule = drum_to_liter();
        for q in [-1.0, -0.0001, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            for dir in [Direction::SecondaryToPrimary, Direction::PrimaryToSecondary] {
                assert_matches!(
                    resolve(&ConversionQuery::new(&rule, dir, q)),
                    Err(ConversionError::InvalidQuantity(_))
                );
            }
        }
    }

    #[test]
    fn test_rejects_non_positive_equivalence() {
        for eq in [0.0, -200.0, f64::NAN] {
            let rule = ConversionRule::new("bad", "DRUM", "LITER", eq);
            assert_matches!(
                resolve(&ConversionQuery::secondary_to_primary(&rule, 50.0)),
                Err(ConversionError::InvalidRule { .. })
            );
        }
    }

    #[test]
    fn test_rejects_self_rule() {
        let rule = ConversionRule::new("self", "BOX", "BOX", 12.0);
        for dir in [Direction::SecondaryToPrimary, Direction::PrimaryToSecondary] {
            assert_matches!(
                resolve(&ConversionQuery::new(&rule, dir, 3.0)),
                Err(ConversionError::InvalidRule { .. })
            );
        }
    }

    #[test]
    fn test_quantity_checked_before_rule() {
        let rule = ConversionRule::new("bad", "DRUM", "LITER", 0.0);
        assert_matches!(
            resolve(&ConversionQuery::secondary_to_primary(&rule, -5.0)),
            Err(ConversionError::InvalidQuantity(_))
        );
    }

    #[test]
    fn test_overflow_is_invalid_quantity() {
        let rule = ConversionRule::new("huge", "P", "S", 1e300);
        assert_matches!(
            resolve(&ConversionQuery::primary_to_secondary(&rule, 1e300)),
            Err(ConversionError::InvalidQuantity(_))
        );
    }

    #[test]
    fn test_configured_display_digits() {
        let resolver = ConversionResolver::new(EngineConfig::new().with_display_digits(2));
        let rule = ConversionRule::new("r", "GALLON", "LITER", 3.785411784);
        let result = resolver.resolve(&ConversionQuery::primary_to_secondary(&rule, 1.0)).unwrap();
        assert_eq!(result.display, "3.79");
        assert_eq!(result.raw, 3.785411784);
    }

    #[test]
    fn test_zero_quantity() {
        let rule = drum_to_liter();
        let result = resolve(&ConversionQuery::secondary_to_primary(&rule, 0.0)).unwrap();
        assert_eq!(result.raw, 0.0);
        assert_eq!(result.display, "0");
    }
}
