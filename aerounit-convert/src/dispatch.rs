//! Dispatch unit sets
//!
//! The secondary units an article can be dispatched in, kept as an ordered,
//! de-duplicated list of rule ids. Every rule must convert from the
//! article's primary unit.
//!
//! Lifecycle: `Empty -> Configuring -> Finalized`. Finalizing consumes the
//! set; editing after a submission starts from `FinalizedDispatchSet::reopen`.

use serde::Serialize;
use aerounit_catalog::ConversionRegistry;
use aerounit_core::{ConversionError, ConversionRule, RuleId, UnitId};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchState {
    Empty,
    Configuring,
    Finalized,
}

/// Editable dispatch rule set for one article
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchUnitSet {
    primary_unit: UnitId,
    rule_ids: Vec<RuleId>,
}

impl DispatchUnitSet {
    pub fn new(primary_unit: UnitId) -> Self {
        Self { primary_unit, rule_ids: Vec::new() }
    }

    /// Rebuild a set from persisted ids, checking each against `registry`
    pub fn from_ids<'a>(
        primary_unit: UnitId,
        ids: impl IntoIterator<Item = &'a RuleId>,
        registry: &ConversionRegistry,
    ) -> Result<Self, ConversionError> {
        let mut set = Self::new(primary_unit);
        for id in ids {
            set.add(registry, id)?;
        }
        Ok(set)
    }

    pub fn primary_unit(&self) -> &UnitId {
        &self.primary_unit
    }

    pub fn state(&self) -> DispatchState {
        if self.rule_ids.is_empty() {
            DispatchState::Empty
        } else {
            DispatchState::Configuring
        }
    }

    /// Attach a rule from the current registry
    pub fn add<'r>(&mut self, registry: &'r ConversionRegistry, rule_id: &RuleId) -> Result<&'r ConversionRule, ConversionError> {
        if self.contains(rule_id) {
            return Err(ConversionError::DuplicateRule(rule_id.clone()));
        }
        let rule = registry.rule_by_id(rule_id)?;
        self.add_rule(rule)?;
        Ok(rule)
    }

    /// Attach a rule already in hand
    pub fn add_rule(&mut self, rule: &ConversionRule) -> Result<(), ConversionError> {
        if self.contains(&rule.id) {
            return Err(ConversionError::DuplicateRule(rule.id.clone()));
        }
        if rule.primary_unit != self.primary_unit {
            return Err(ConversionError::RulePrimaryMismatch {
                rule: rule.id.clone(),
                expected: self.primary_unit.clone(),
                found: rule.primary_unit.clone(),
            });
        }
        debug!(rule = %rule.id, primary = %self.primary_unit, "dispatch rule added");
        self.rule_ids.push(rule.id.clone());
        Ok(())
    }

    /// Detach a rule. Returns whether it was present; absence is not an error.
    pub fn remove(&mut self, rule_id: &RuleId) -> bool {
        let before = self.rule_ids.len();
        self.rule_ids.retain(|id| id != rule_id);
        before != self.rule_ids.len()
    }

    pub fn contains(&self, rule_id: &RuleId) -> bool {
        self.rule_ids.contains(rule_id)
    }

    pub fn len(&self) -> usize {
        self.rule_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_ids.is_empty()
    }

    pub fn ids(&self) -> &[RuleId] {
        &self.rule_ids
    }

    /// Insertion-ordered ids, as persisted
    pub fn to_ordered_ids(&self) -> Vec<RuleId> {
        self.rule_ids.clone()
    }

    /// Rules that could still be added
    pub fn available<'r>(&self, registry: &'r ConversionRegistry) -> Vec<&'r ConversionRule> {
        registry.available_secondary_units(&self.primary_unit, &self.rule_ids)
    }

    /// Resolve attached ids against `registry`, in order.
    ///
    /// Fails on the first id that is gone or no longer starts from the
    /// primary unit, which happens after the host rebuilds the registry.
    pub fn rules<'r>(&self, registry: &'r ConversionRegistry) -> Result<Vec<&'r ConversionRule>, ConversionError> {
        self.rule_ids.iter()
            .map(|id| {
                let rule = registry.rule_by_id(id).inspect_err(|_| {
                    warn!(rule = %id, "stale dispatch rule: not in registry");
                })?;
                if rule.primary_unit != self.primary_unit {
                    warn!(rule = %id, "stale dispatch rule: primary unit changed");
                    return Err(ConversionError::RulePrimaryMismatch {
                        rule: id.clone(),
                        expected: self.primary_unit.clone(),
                        found: rule.primary_unit.clone(),
                    });
                }
                Ok(rule)
            })
            .collect()
    }

    pub fn revalidate(&self, registry: &ConversionRegistry) -> Result<(), ConversionError> {
        self.rules(registry).map(|_| ())
    }

    /// Swap the primary unit, dropping every attached rule
    pub(crate) fn reset_primary(&mut self, primary_unit: UnitId) -> Vec<RuleId> {
        self.primary_unit = primary_unit;
        std::mem::take(&mut self.rule_ids)
    }

    pub fn finalize(self) -> FinalizedDispatchSet {
        FinalizedDispatchSet {
            primary_unit: self.primary_unit,
            rule_ids: self.rule_ids,
        }
    }
}

/// A dispatch set handed to persistence; read-only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalizedDispatchSet {
    primary_unit: UnitId,
    rule_ids: Vec<RuleId>,
}

impl FinalizedDispatchSet {
    pub fn state(&self) -> DispatchState {
        DispatchState::Finalized
    }

    pub fn primary_unit(&self) -> &UnitId {
        &self.primary_unit
    }

    pub fn to_ordered_ids(&self) -> Vec<RuleId> {
        self.rule_ids.clone()
    }

    pub fn len(&self) -> usize {
        self.rule_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_ids.is_empty()
    }

    /// Start a new editable set with the same contents
    pub fn reopen(&self) -> DispatchUnitSet {
        DispatchUnitSet {
            primary_unit: self.primary_unit.clone(),
            rule_ids: self.rule_ids.clone(),
        }
    }
}
