//! Per-article unit configuration and the record submitted on intake

use serde::{Deserialize, Serialize};
use aerounit_core::{ArticleId, ConversionError, RuleId, UnitId};
use tracing::info;
use crate::{DispatchUnitSet, FinalizedDispatchSet, ReceivedQuantity};

/// Result of changing an article's primary unit.
///
/// Dispatch rules convert from the primary unit, so a change drops all of
/// them. `cleared` lists what was dropped so the form can tell the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryUnitChange {
    pub previous: UnitId,
    pub current: UnitId,
    pub cleared: Vec<RuleId>,
}

impl PrimaryUnitChange {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Primary unit plus dispatch rules for one consumable article
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleUnitConfig {
    article_id: ArticleId,
    dispatch: DispatchUnitSet,
}

impl ArticleUnitConfig {
    pub fn new(article_id: ArticleId, primary_unit: UnitId) -> Self {
        Self {
            article_id,
            dispatch: DispatchUnitSet::new(primary_unit),
        }
    }

    /// Wrap an existing dispatch set, e.g. one rebuilt with `DispatchUnitSet::from_ids`
    pub fn with_dispatch(article_id: ArticleId, dispatch: DispatchUnitSet) -> Self {
        Self { article_id, dispatch }
    }

    pub fn article_id(&self) -> &ArticleId {
        &self.article_id
    }

    pub fn primary_unit(&self) -> &UnitId {
        self.dispatch.primary_unit()
    }

    pub fn dispatch(&self) -> &DispatchUnitSet {
        &self.dispatch
    }

    pub fn dispatch_mut(&mut self) -> &mut DispatchUnitSet {
        &mut self.dispatch
    }

    /// Set a new primary unit, clearing every dispatch rule.
    ///
    /// Setting the current primary unit again changes nothing.
    pub fn change_primary_unit(&mut self, primary_unit: UnitId) -> PrimaryUnitChange {
        let previous = self.primary_unit().clone();
        if previous == primary_unit {
            return PrimaryUnitChange { previous, current: primary_unit, cleared: Vec::new() };
        }

        let cleared = self.dispatch.reset_primary(primary_unit.clone());
        if !cleared.is_empty() {
            info!(
                article = %self.article_id,
                from = %previous,
                to = %primary_unit,
                cleared = cleared.len(),
                "primary unit changed, dispatch rules cleared"
            );
        }
        PrimaryUnitChange { previous, current: primary_unit, cleared }
    }

    /// Close the configuration and produce the record to persist.
    ///
    /// `receipt` must be expressed in this article's primary unit.
    pub fn finalize(self, receipt: Option<&ReceivedQuantity>) -> Result<IntakeSubmission, ConversionError> {
        if let Some(r) = receipt {
            if &r.primary_unit != self.primary_unit() {
                return Err(ConversionError::no_conversion(&r.primary_unit, self.primary_unit()));
            }
        }

        let article_id = self.article_id;
        let dispatch = self.dispatch.finalize();
        Ok(IntakeSubmission::new(article_id, dispatch, receipt))
    }
}

/// The quantity as the operator entered it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivedLine {
    pub unit_id: UnitId,
    pub quantity: f64,
}

/// Record handed to the persistence collaborator on submit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeSubmission {
    pub article_id: ArticleId,
    pub primary_unit_id: UnitId,
    /// Full precision, in the primary unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_in: Option<ReceivedLine>,
    pub dispatch_rule_ids: Vec<RuleId>,
}

impl IntakeSubmission {
    fn new(article_id: ArticleId, dispatch: FinalizedDispatchSet, receipt: Option<&ReceivedQuantity>) -> Self {
        Self {
            article_id,
            primary_unit_id: dispatch.primary_unit().clone(),
            quantity: receipt.map(|r| r.quantity),
            received_in: receipt.map(|r| r.received.clone()),
            dispatch_rule_ids: dispatch.to_ordered_ids(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use aerounit_catalog::ConversionRegistry;
    use aerounit_core::ConversionRule;

    fn registry() -> ConversionRegistry {
        aerounit_core::testing::init_tracing();
        ConversionRegistry::new([
            ConversionRule::new("drum_l", "DRUM", "L", 200.0),
            ConversionRule::new("drum_gal", "DRUM", "GAL", 52.8),
            ConversionRule::new("l_ml", "L", "ML", 1000.0),
        ])
    }

    fn config_with_rules(reg: &ConversionRegistry) -> ArticleUnitConfig {
        let mut config = ArticleUnitConfig::new("A-100".into(), "DRUM".into());
        config.dispatch_mut().add(reg, &"drum_l".into()).unwrap();
        config.dispatch_mut().add(reg, &"drum_gal".into()).unwrap();
        config
    }

    #[test]
    fn test_change_primary_clears_rules() {
        let reg = registry();
        let mut config = config_with_rules(&reg);

        let change = config.change_primary_unit("L".into());
        assert!(change.changed());
        assert_eq!(change.previous.as_str(), "DRUM");
        assert_eq!(change.cleared, vec![RuleId::from("drum_l"), RuleId::from("drum_gal")]);
        assert!(config.dispatch().is_empty());
        assert_eq!(config.primary_unit().as_str(), "L");

        // Rules for the new primary are accepted, old ones are not
        config.dispatch_mut().add(&reg, &"l_ml".into()).unwrap();
        assert_matches!(
            config.dispatch_mut().add(&reg, &"drum_l".into()),
            Err(ConversionError::RulePrimaryMismatch { .. })
        );
    }

    #[test]
    fn test_same_primary_is_noop() {
        let reg = registry();
        let mut config = config_with_rules(&reg);
        let change = config.change_primary_unit("DRUM".into());
        assert!(!change.changed());
        assert!(change.cleared.is_empty());
        assert_eq!(config.dispatch().len(), 2);
    }

    #[test]
    fn test_finalize_without_receipt() {
        let reg = registry();
        let submission = config_with_rules(&reg).finalize(None).unwrap();
        assert_eq!(submission.primary_unit_id.as_str(), "DRUM");
        assert_eq!(submission.quantity, None);
        assert_eq!(
            submission.dispatch_rule_ids,
            vec![RuleId::from("drum_l"), RuleId::from("drum_gal")]
        );

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["article_id"], "A-100");
        assert_eq!(json["dispatch_rule_ids"], serde_json::json!(["drum_l", "drum_gal"]));
        assert!(json.get("quantity").is_none());
    }

    #[test]
    fn test_finalize_rejects_foreign_receipt() {
        let reg = registry();
        let receipt = ReceivedQuantity::direct("L".into(), 5.0).unwrap();
        assert_matches!(
            config_with_rules(&reg).finalize(Some(&receipt)),
            Err(ConversionError::NoConversionFound(_))
        );
    }
}
