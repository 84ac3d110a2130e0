//! Aerounit Core - Fundamental types
//!
//! This crate provides the core types used throughout Aerounit:
//! - `UnitId`, `RuleId`, `ArticleId`, `CompanyId`: catalog identifiers
//! - `Unit`, `ConversionRule`, `Direction`: conversion reference data
//! - `ConversionError`: typed engine failures
//! - `EngineError`: structured messages for inline form display
//! - `EngineConfig`: numeric presentation settings

mod ids;
mod unit;
mod number;
mod error;
mod config;

#[cfg(feature = "testing")]
pub mod testing;

pub use ids::{UnitId, RuleId, ArticleId, CompanyId};
pub use unit::{Unit, ConversionRule, Direction};
pub use number::{validate_quantity, format_quantity, DEFAULT_DISPLAY_DIGITS, MAX_DISPLAY_DIGITS};
pub use error::{ConversionError, MissingConversion, EngineError, Severity, codes};
pub use config::EngineConfig;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        UnitId, RuleId, ArticleId, CompanyId,
        Unit, ConversionRule, Direction,
        ConversionError, MissingConversion, EngineError, Severity, EngineConfig,
    };
    pub use crate::error::codes;
}
