//! Typed engine errors and structured form messages
//!
//! Errors never crash the intake form. `ConversionError` is what engine
//! operations return; `EngineError` is the serializable shape the form
//! renders inline next to the offending field.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::{UnitId, RuleId};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_QUANTITY: &str = "INVALID_QUANTITY";
    pub const INVALID_RULE: &str = "INVALID_RULE";
    pub const NO_CONVERSION_FOUND: &str = "NO_CONVERSION_FOUND";
    pub const DUPLICATE_RULE: &str = "DUPLICATE_RULE";
    pub const RULE_PRIMARY_MISMATCH: &str = "RULE_PRIMARY_MISMATCH";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const CATALOG_UNAVAILABLE: &str = "CATALOG_UNAVAILABLE";
}

/// What a failed conversion lookup was looking for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingConversion {
    /// No direct rule between two units
    Units { from: UnitId, to: UnitId },
    /// A rule id that the current registry does not know
    Rule(RuleId),
}

impl std::fmt::Display for MissingConversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingConversion::Units { from, to } => write!(f, "{} → {}", from, to),
            MissingConversion::Rule(id) => write!(f, "rule {}", id),
        }
    }
}

/// Failures of registry lookups, resolution and dispatch-set edits.
///
/// All variants are deterministic for the same inputs; callers do not retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Invalid quantity: {0} (must be a finite, non-negative number)")]
    InvalidQuantity(f64),

    #[error("Invalid conversion rule {rule}: {reason}")]
    InvalidRule { rule: RuleId, reason: String },

    #[error("No conversion defined for {0}")]
    NoConversionFound(MissingConversion),

    #[error("Rule {0} is already configured for dispatch")]
    DuplicateRule(RuleId),

    #[error("Rule {rule} converts from {found}, but the article's primary unit is {expected}")]
    RulePrimaryMismatch { rule: RuleId, expected: UnitId, found: UnitId },
}

impl ConversionError {
    pub fn no_conversion(from: &UnitId, to: &UnitId) -> Self {
        ConversionError::NoConversionFound(MissingConversion::Units {
            from: from.clone(),
            to: to.clone(),
        })
    }

    pub fn unknown_rule(id: &RuleId) -> Self {
        ConversionError::NoConversionFound(MissingConversion::Rule(id.clone()))
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ConversionError::InvalidQuantity(_) => codes::INVALID_QUANTITY,
            ConversionError::InvalidRule { .. } => codes::INVALID_RULE,
            ConversionError::NoConversionFound(_) => codes::NO_CONVERSION_FOUND,
            ConversionError::DuplicateRule(_) => codes::DUPLICATE_RULE,
            ConversionError::RulePrimaryMismatch { .. } => codes::RULE_PRIMARY_MISMATCH,
        }
    }
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Shown inline, submission still allowed
    Warning,
    /// Must be corrected before submission
    Error,
}

/// Structured error for inline form display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// What the operator can do about it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Form field the message belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    pub severity: Severity,
}

impl EngineError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            field: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: attach to a form field
    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }

    // ========== Common Error Constructors ==========

    pub fn unknown_unit(symbol: &str) -> Self {
        Self::new(codes::UNKNOWN_UNIT, format!("Unknown unit: {}", symbol))
            .with_suggestion("Pick a unit from the catalog list")
    }

    pub fn catalog_unavailable(details: impl Into<String>) -> Self {
        Self::new(codes::CATALOG_UNAVAILABLE, format!("Unit catalog unavailable: {}", details.into()))
            .with_suggestion("Reload the form to fetch units and conversions again")
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for EngineError {}

impl From<ConversionError> for EngineError {
    fn from(err: ConversionError) -> Self {
        let base = Self::new(err.code(), err.to_string());
        match err {
            ConversionError::InvalidQuantity(_) => base
                .with_suggestion("Enter a quantity of zero or more")
                .on_field("quantity"),
            ConversionError::InvalidRule { .. } => base
                .with_suggestion("Ask an administrator to correct the conversion rule"),
            ConversionError::NoConversionFound(_) => base
                .with_suggestion("Pick a different unit, or enter the quantity in the primary unit")
                .with_severity(Severity::Warning),
            ConversionError::DuplicateRule(_) => base
                .with_suggestion("This dispatch unit is already configured")
                .on_field("dispatch_units"),
            ConversionError::RulePrimaryMismatch { .. } => base
                .with_suggestion("Choose a conversion that starts from the article's primary unit")
                .on_field("dispatch_units"),
        }
    }
}
