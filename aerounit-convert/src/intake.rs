//! Intake reconciliation
//!
//! Turns "received N of unit U" into a quantity in the article's primary
//! unit, using a single direct rule from the registry.

use serde::Serialize;
use aerounit_catalog::ConversionRegistry;
use aerounit_core::{
    format_quantity, validate_quantity, ConversionError, EngineConfig, RuleId, UnitId, DEFAULT_DISPLAY_DIGITS,
};
use tracing::{debug, warn};
use crate::{ArticleUnitConfig, ConversionQuery, ConversionResolver, ConversionResult, ReceivedLine};

/// A received quantity reconciled to the primary unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceivedQuantity {
    pub primary_unit: UnitId,
    /// Full precision, in the primary unit
    pub quantity: f64,
    pub display: String,
    pub received: ReceivedLine,
    /// Rule used, `None` when no conversion was needed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<RuleId>,
    /// Set when no rule existed and the entry was taken as primary units
    pub fallback: bool,
}

impl ReceivedQuantity {
    /// Quantity entered directly in the primary unit
    pub fn direct(primary_unit: UnitId, quantity: f64) -> Result<Self, ConversionError> {
        Self::direct_with_digits(primary_unit, quantity, DEFAULT_DISPLAY_DIGITS)
    }

    fn direct_with_digits(primary_unit: UnitId, quantity: f64, digits: u32) -> Result<Self, ConversionError> {
        let quantity = validate_quantity(quantity)?;
        Ok(Self {
            received: ReceivedLine { unit_id: primary_unit.clone(), quantity },
            primary_unit,
            quantity,
            display: format_quantity(quantity, digits),
            rule_id: None,
            fallback: false,
        })
    }

    fn converted(result: ConversionResult) -> Self {
        Self {
            primary_unit: result.to_unit,
            quantity: result.raw,
            display: result.display,
            received: ReceivedLine { unit_id: result.from_unit, quantity: result.input_quantity },
            rule_id: Some(result.rule_id),
            fallback: false,
        }
    }

    pub fn is_converted(&self) -> bool {
        self.rule_id.is_some()
    }
}

/// Registry lookups plus resolution for the intake form
#[derive(Debug, Clone)]
pub struct IntakeReconciler<'r> {
    registry: &'r ConversionRegistry,
    resolver: ConversionResolver,
}

impl<'r> IntakeReconciler<'r> {
    pub fn new(registry: &'r ConversionRegistry) -> Self {
        Self { registry, resolver: ConversionResolver::default() }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.resolver = ConversionResolver::new(config);
        self
    }

    pub fn registry(&self) -> &'r ConversionRegistry {
        self.registry
    }

    /// Reconcile `quantity` of `received_unit` into `primary_unit`.
    ///
    /// Same unit passes through; otherwise a direct rule must exist.
    pub fn receive(&self, primary_unit: &UnitId, received_unit: &UnitId, quantity: f64) -> Result<ReceivedQuantity, ConversionError> {
        if primary_unit == received_unit {
            return ReceivedQuantity::direct_with_digits(primary_unit.clone(), quantity, self.digits());
        }

        let (rule, direction) = self.registry.find_conversion(received_unit, primary_unit)?;
        let result = self.resolver.resolve(&ConversionQuery::new(rule, direction, quantity))?;
        debug!(primary = %primary_unit, received = %received_unit, raw = result.raw, "intake reconciled");
        Ok(ReceivedQuantity::converted(result))
    }

    /// Like `receive`, but a missing rule falls back to taking `quantity` as
    /// primary units, flagged with `fallback`. `received` still records the
    /// unit as entered. Other errors still fail.
    pub fn receive_or_direct(&self, primary_unit: &UnitId, received_unit: &UnitId, quantity: f64) -> Result<ReceivedQuantity, ConversionError> {
        match self.receive(primary_unit, received_unit, quantity) {
            Err(ConversionError::NoConversionFound(missing)) => {
                warn!(%missing, "no conversion, accepting quantity in primary unit");
                let mut direct = ReceivedQuantity::direct_with_digits(primary_unit.clone(), quantity, self.digits())?;
                // Keep the unit the operator actually entered
                direct.received.unit_id = received_unit.clone();
                direct.fallback = true;
                Ok(direct)
            }
            other => other,
        }
    }

    /// `receive` against an article's configured primary unit
    pub fn receive_for(&self, article: &ArticleUnitConfig, received_unit: &UnitId, quantity: f64) -> Result<ReceivedQuantity, ConversionError> {
        self.receive(article.primary_unit(), received_unit, quantity)
    }

    /// Express a stocked primary-unit quantity in a dispatch rule's secondary unit
    pub fn dispatch_quantity(&self, rule_id: &RuleId, primary_quantity: f64) -> Result<ConversionResult, ConversionError> {
        let rule = self.registry.rule_by_id(rule_id)?;
        self.resolver.resolve(&ConversionQuery::primary_to_secondary(rule, primary_quantity))
    }

    fn digits(&self) -> u32 {
        self.resolver.config().display_fraction_digits
    }
}
