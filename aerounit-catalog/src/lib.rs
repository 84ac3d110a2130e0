//! Aerounit Catalog
//!
//! Read-only views over the unit catalog and conversion rules supplied by
//! the host application:
//! - `CatalogProvider`: collaborator the host implements to fetch records
//! - `CatalogSnapshot`: one fetched generation of units and rules
//! - `UnitCatalog`: units by id, symbol or label
//! - `ConversionRegistry`: rules indexed by primary unit
//!
//! Nothing here caches or invalidates. When the backing data changes the host
//! fetches a new snapshot and builds a new registry.

mod traits;
mod units;
mod registry;
mod snapshot;

pub use traits::{CatalogProvider, CatalogError, InMemoryCatalog};
pub use units::UnitCatalog;
pub use registry::ConversionRegistry;
pub use snapshot::CatalogSnapshot;

/// Re-export core types for catalog consumers
pub mod prelude {
    pub use crate::{
        CatalogProvider, CatalogError, InMemoryCatalog,
        UnitCatalog, ConversionRegistry, CatalogSnapshot,
    };
    pub use aerounit_core::prelude::*;
}
