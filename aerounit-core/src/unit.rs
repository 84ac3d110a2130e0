//! Units and conversion rules

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::{UnitId, RuleId, ConversionError};

/// A unit of measure as published by the external catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    /// Human label (e.g., "Liter", "Drum")
    pub label: String,
    /// Short symbol (e.g., "L", "DR")
    pub symbol: String,
}

impl Unit {
    pub fn new(id: impl Into<UnitId>, label: &str, symbol: &str) -> Self {
        Unit {
            id: id.into(),
            label: label.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// Which side of a rule the input quantity is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Input in secondary units, output in primary units (divide)
    SecondaryToPrimary,
    /// Input in primary units, output in secondary units (multiply)
    PrimaryToSecondary,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::SecondaryToPrimary => Direction::PrimaryToSecondary,
            Direction::PrimaryToSecondary => Direction::SecondaryToPrimary,
        }
    }
}

/// A direct conversion between two units.
///
/// `equivalence` counts how many secondary units make exactly one primary
/// unit: a `DRUM -> LITER` rule with equivalence 200 reads "200 liters per drum".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRule {
    pub id: RuleId,
    pub primary_unit: UnitId,
    pub secondary_unit: UnitId,
    pub equivalence: f64,
}

impl ConversionRule {
    pub fn new(
        id: impl Into<RuleId>,
        primary_unit: impl Into<UnitId>,
        secondary_unit: impl Into<UnitId>,
        equivalence: f64,
    ) -> Self {
        ConversionRule {
            id: id.into(),
            primary_unit: primary_unit.into(),
            secondary_unit: secondary_unit.into(),
            equivalence,
        }
    }

    /// Check the numeric invariant the resolver depends on.
    ///
    /// Uniqueness per unit pair is owned by the catalog and not checked here.
    pub fn validate(&self) -> Result<(), ConversionError> {
        if !self.equivalence.is_finite() || self.equivalence <= 0.0 {
            return Err(ConversionError::InvalidRule {
                rule: self.id.clone(),
                reason: format!("equivalence must be a positive number, got {}", self.equivalence),
            });
        }
        if self.primary_unit == self.secondary_unit {
            return Err(ConversionError::InvalidRule {
                rule: self.id.clone(),
                reason: format!("primary and secondary unit are both {}", self.primary_unit),
            });
        }
        Ok(())
    }

    /// Unit the input quantity is expressed in for the given direction
    pub fn source_unit(&self, direction: Direction) -> &UnitId {
        match direction {
            Direction::SecondaryToPrimary => &self.secondary_unit,
            Direction::PrimaryToSecondary => &self.primary_unit,
        }
    }

    /// Unit the result is expressed in for the given direction
    pub fn target_unit(&self, direction: Direction) -> &UnitId {
        self.source_unit(direction.reversed())
    }
}

impl fmt::Display for ConversionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}({})", self.primary_unit, self.secondary_unit, self.equivalence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_validate_accepts_positive() {
        let rule = ConversionRule::new("r1", "DOZEN", "UNIT", 12.0);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        for eq in [0.0, -4.0, f64::NAN, f64::INFINITY] {
            let rule = ConversionRule::new("r1", "BOX", "UNIT", eq);
            assert_matches!(rule.validate(), Err(ConversionError::InvalidRule { .. }));
        }
    }

    #[test]
    fn test_validate_rejects_self_rule() {
        let rule = ConversionRule::new("r1", "BOX", "BOX", 1.0);
        assert_matches!(rule.validate(), Err(ConversionError::InvalidRule { .. }));
    }

    #[test]
    fn test_display() {
        let rule = ConversionRule::new("r1", "A", "B", 12.0);
        assert_eq!(rule.to_string(), "A→B(12)");
    }
}
