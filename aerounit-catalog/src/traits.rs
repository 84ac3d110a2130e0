//! Catalog collaborator interface

use aerounit_core::{ConversionRule, EngineError, Unit, UnitId};
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a catalog provider
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("malformed {record} record: {reason}")]
    Malformed { record: String, reason: String },
}

impl From<CatalogError> for EngineError {
    fn from(err: CatalogError) -> Self {
        EngineError::catalog_unavailable(err.to_string())
    }
}

/// Source of units and conversion rules, implemented by the host.
///
/// Implementations own fetching, retries and caching. The engine calls each
/// method at most once per snapshot.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn get_units(&self) -> Result<Vec<Unit>, CatalogError>;

    /// Rules whose primary unit is `primary_unit`, or every rule when `None`
    async fn get_rules(&self, primary_unit: Option<&UnitId>) -> Result<Vec<ConversionRule>, CatalogError>;
}

/// Provider over records already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    units: Vec<Unit>,
    rules: Vec<ConversionRule>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    pub fn with_rule(mut self, rule: ConversionRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_units(mut self, units: impl IntoIterator<Item = Unit>) -> Self {
        self.units.extend(units);
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = ConversionRule>) -> Self {
        self.rules.extend(rules);
        self
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalog {
    async fn get_units(&self) -> Result<Vec<Unit>, CatalogError> {
        Ok(self.units.clone())
    }

    async fn get_rules(&self, primary_unit: Option<&UnitId>) -> Result<Vec<ConversionRule>, CatalogError> {
        Ok(self.rules.iter()
            .filter(|r| primary_unit.map_or(true, |p| &r.primary_unit == p))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerounit_core::Severity;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_unit(Unit::new("DRUM", "Drum", "DR"))
            .with_unit(Unit::new("LITER", "Liter", "L"))
            .with_rule(ConversionRule::new("r1", "DRUM", "LITER", 200.0))
            .with_rule(ConversionRule::new("r2", "BOX", "UNIT", 12.0))
    }

    #[tokio::test]
    async fn test_get_rules_filtered() {
        let rules = catalog().get_rules(Some(&UnitId::from("DRUM"))).await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id.as_str(), "r1");
    }

    #[tokio::test]
    async fn test_get_rules_all() {
        let rules = catalog().get_rules(None).await.unwrap();
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_catalog_error_is_blocking() {
        let err: EngineError = CatalogError::Unavailable("timeout".into()).into();
        assert_eq!(err.severity, Severity::Error);
        assert!(err.message.contains("timeout"));
    }
}
