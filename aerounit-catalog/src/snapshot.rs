//! One fetched generation of catalog data

use aerounit_core::{CompanyId, ConversionRule, Unit, UnitId};
use tracing::info;
use crate::{CatalogError, CatalogProvider, ConversionRegistry, UnitCatalog};

/// Units and rules fetched together from a provider
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub units: Vec<Unit>,
    pub rules: Vec<ConversionRule>,
}

impl CatalogSnapshot {
    pub fn new(units: Vec<Unit>, rules: Vec<ConversionRule>) -> Self {
        Self { units, rules }
    }

    /// Fetch every unit and every rule
    pub async fn fetch<P: CatalogProvider + ?Sized>(provider: &P) -> Result<Self, CatalogError> {
        let units = provider.get_units().await?;
        let rules = provider.get_rules(None).await?;
        Self::checked(units, rules)
    }

    /// Fetch every unit and only the rules for one primary unit
    pub async fn fetch_for_primary<P: CatalogProvider + ?Sized>(
        provider: &P,
        primary_unit: &UnitId,
    ) -> Result<Self, CatalogError> {
        let units = provider.get_units().await?;
        let rules = provider.get_rules(Some(primary_unit)).await?;
        Self::checked(units, rules)
    }

    fn checked(units: Vec<Unit>, rules: Vec<ConversionRule>) -> Result<Self, CatalogError> {
        if let Some(unit) = units.iter().find(|u| u.id.as_str().is_empty()) {
            return Err(CatalogError::Malformed {
                record: "unit".to_string(),
                reason: format!("empty id (symbol {:?})", unit.symbol),
            });
        }
        if let Some(rule) = rules.iter().find(|r| r.id.as_str().is_empty()) {
            return Err(CatalogError::Malformed {
                record: "conversion rule".to_string(),
                reason: format!("empty id ({} → {})", rule.primary_unit, rule.secondary_unit),
            });
        }
        info!(units = units.len(), rules = rules.len(), "catalog snapshot fetched");
        Ok(Self { units, rules })
    }

    /// Build a registry over this snapshot
    pub fn registry(&self) -> ConversionRegistry {
        ConversionRegistry::new(self.rules.iter().cloned())
            .with_units(UnitCatalog::new(self.units.iter().cloned()))
    }

    /// Build a registry for the owning company, consuming the snapshot
    pub fn into_registry(self, company: CompanyId) -> ConversionRegistry {
        ConversionRegistry::new(self.rules)
            .with_units(UnitCatalog::new(self.units))
            .for_company(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use crate::InMemoryCatalog;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_units([
                Unit::new("DRUM", "Drum", "DR"),
                Unit::new("LITER", "Liter", "L"),
                Unit::new("GALLON", "Gallon", "gal"),
            ])
            .with_rules([
                ConversionRule::new("r1", "DRUM", "LITER", 200.0),
                ConversionRule::new("r2", "DRUM", "GALLON", 55.0),
                ConversionRule::new("r3", "GALLON", "LITER", 3.785),
            ])
    }

    struct Offline;

    #[async_trait]
    impl CatalogProvider for Offline {
        async fn get_units(&self) -> Result<Vec<Unit>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".into()))
        }

        async fn get_rules(&self, _primary_unit: Option<&UnitId>) -> Result<Vec<ConversionRule>, CatalogError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_fetch_builds_registry() {
        aerounit_core::testing::init_tracing();
        let snapshot = CatalogSnapshot::fetch(&catalog()).await.unwrap();
        let registry = snapshot.registry();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.units().len(), 3);

        let secondaries: Vec<&str> = registry.secondary_units_for(&"DRUM".into(), &[])
            .into_iter()
            .map(|u| u.symbol.as_str())
            .collect();
        assert_eq!(secondaries, ["L", "gal"]);
    }

    #[tokio::test]
    async fn test_fetch_for_primary() {
        let snapshot = CatalogSnapshot::fetch_for_primary(&catalog(), &"GALLON".into()).await.unwrap();
        let registry = snapshot.into_registry("acme".into());
        assert_eq!(registry.len(), 1);
        assert!(registry.rules_for_primary(&"DRUM".into()).is_empty());
        assert_eq!(registry.company().unwrap().as_str(), "acme");
    }

    #[tokio::test]
    async fn test_fetch_propagates_provider_error() {
        let result = CatalogSnapshot::fetch(&Offline).await;
        assert_matches!(result, Err(CatalogError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_empty_ids() {
        let provider = InMemoryCatalog::new().with_rule(ConversionRule::new("", "A", "B", 2.0));
        let result = CatalogSnapshot::fetch(&provider).await;
        assert_matches!(result, Err(CatalogError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_fetch_through_trait_object() {
        let provider: Box<dyn CatalogProvider> = Box::new(catalog());
        let snapshot = CatalogSnapshot::fetch(provider.as_ref()).await.unwrap();
        assert_eq!(snapshot.rules.len(), 3);
    }
}
