//! Conversion rule registry
//!
//! Immutable index over one company's conversion rules. The registry is never
//! mutated after construction: when the rule list changes, build a new one.

use std::collections::{HashMap, HashSet};
use aerounit_core::{CompanyId, ConversionError, ConversionRule, Direction, RuleId, Unit, UnitId};
use tracing::{debug, warn};
use crate::UnitCatalog;

/// Rules indexed by primary unit, id and ordered unit pair
#[derive(Debug, Clone, Default)]
pub struct ConversionRegistry {
    company: Option<CompanyId>,
    /// Source order, minus dropped duplicates
    rules: Vec<ConversionRule>,
    by_id: HashMap<RuleId, usize>,
    by_primary: HashMap<UnitId, Vec<usize>>,
    by_pair: HashMap<(UnitId, UnitId), usize>,
    units: UnitCatalog,
}

impl ConversionRegistry {
    /// Build from a flat rule list, preserving its order.
    ///
    /// A rule reusing an id or an ordered unit pair already indexed is dropped
    /// with a warning. Rules with a bad equivalence are kept; the resolver
    /// rejects them when used.
    pub fn new(rules: impl IntoIterator<Item = ConversionRule>) -> Self {
        let mut registry = ConversionRegistry::default();
        for rule in rules {
            registry.index(rule);
        }
        debug!(rules = registry.rules.len(), primaries = registry.by_primary.len(), "conversion registry built");
        registry
    }

    /// Builder: attach the unit catalog used to resolve secondary units
    pub fn with_units(mut self, units: UnitCatalog) -> Self {
        self.units = units;
        self
    }

    /// Builder: record the owning company
    pub fn for_company(mut self, company: CompanyId) -> Self {
        self.company = Some(company);
        self
    }

    fn index(&mut self, rule: ConversionRule) {
        if self.by_id.contains_key(&rule.id) {
            warn!(rule = %rule.id, "duplicate rule id in source list, keeping first");
            return;
        }
        let pair = (rule.primary_unit.clone(), rule.secondary_unit.clone());
        if let Some(&existing) = self.by_pair.get(&pair) {
            warn!(
                rule = %rule.id,
                kept = %self.rules[existing].id,
                primary = %rule.primary_unit,
                secondary = %rule.secondary_unit,
                "second rule for the same unit pair, keeping first"
            );
            return;
        }
        if let Err(e) = rule.validate() {
            warn!(rule = %rule, error = %e, "indexing invalid conversion rule");
        }

        let idx = self.rules.len();
        self.by_id.insert(rule.id.clone(), idx);
        self.by_primary.entry(rule.primary_unit.clone()).or_default().push(idx);
        self.by_pair.insert(pair, idx);
        self.rules.push(rule);
    }

    pub fn company(&self) -> Option<&CompanyId> {
        self.company.as_ref()
    }

    pub fn units(&self) -> &UnitCatalog {
        &self.units
    }

    /// All indexed rules in source order
    pub fn rules(&self) -> &[ConversionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules converting from `primary_unit`, in source order. Empty when none.
    pub fn rules_for_primary(&self, primary_unit: &UnitId) -> Vec<&ConversionRule> {
        self.by_primary.get(primary_unit)
            .map(|idxs| idxs.iter().map(|&i| &self.rules[i]).collect())
            .unwrap_or_default()
    }

    /// `rules_for_primary` minus the rules already chosen for the article
    pub fn available_secondary_units(&self, primary_unit: &UnitId, already_selected: &[RuleId]) -> Vec<&ConversionRule> {
        let excluded: HashSet<&RuleId> = already_selected.iter().collect();
        self.rules_for_primary(primary_unit)
            .into_iter()
            .filter(|r| !excluded.contains(&r.id))
            .collect()
    }

    /// Catalog units still selectable as a secondary unit.
    ///
    /// Rules whose secondary unit is missing from the catalog are skipped.
    pub fn secondary_units_for(&self, primary_unit: &UnitId, already_selected: &[RuleId]) -> Vec<&Unit> {
        self.available_secondary_units(primary_unit, already_selected)
            .into_iter()
            .filter_map(|r| {
                let unit = self.units.get(&r.secondary_unit);
                if unit.is_none() {
                    debug!(rule = %r.id, unit = %r.secondary_unit, "secondary unit not in catalog");
                }
                unit
            })
            .collect()
    }

    /// Distinct primary units in first-seen order
    pub fn primary_units(&self) -> Vec<&UnitId> {
        let mut seen = HashSet::new();
        self.rules.iter()
            .map(|r| &r.primary_unit)
            .filter(|u| seen.insert(*u))
            .collect()
    }

    pub fn rule_by_id(&self, id: &RuleId) -> Result<&ConversionRule, ConversionError> {
        self.by_id.get(id)
            .map(|&i| &self.rules[i])
            .ok_or_else(|| ConversionError::unknown_rule(id))
    }

    /// The direct rule for an ordered `(primary, secondary)` pair
    pub fn rule_between(&self, primary_unit: &UnitId, secondary_unit: &UnitId) -> Result<&ConversionRule, ConversionError> {
        self.by_pair.get(&(primary_unit.clone(), secondary_unit.clone()))
            .map(|&i| &self.rules[i])
            .ok_or_else(|| ConversionError::no_conversion(primary_unit, secondary_unit))
    }

    /// Find a direct rule converting `from` into `to`, in either orientation.
    ///
    /// A rule with `to` as primary is preferred, since it divides into the
    /// canonical unit. Never chains through intermediate units.
    pub fn find_conversion(&self, from: &UnitId, to: &UnitId) -> Result<(&ConversionRule, Direction), ConversionError> {
        if let Ok(rule) = self.rule_between(to, from) {
            return Ok((rule, Direction::SecondaryToPrimary));
        }
        if let Ok(rule) = self.rule_between(from, to) {
            return Ok((rule, Direction::PrimaryToSecondary));
        }
        debug!(from = %from, to = %to, "no direct conversion");
        Err(ConversionError::no_conversion(from, to))
    }
}
