//! Catalog identifiers
//!
//! The catalog may key records by integers or UUIDs; the engine only needs
//! equality and hashing, so every id is an opaque string newtype.

use std::fmt;
use serde::{Deserialize, Serialize};

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<i64> for $name {
            fn from(n: i64) -> Self {
                Self(n.to_string())
            }
        }
    };
}

catalog_id!(
    /// Identifier of a unit in the external catalog
    UnitId
);
catalog_id!(
    /// Identifier of a conversion rule
    RuleId
);
catalog_id!(
    /// Identifier of the consumable article being received
    ArticleId
);
catalog_id!(
    /// Owning scope for a set of conversion rules
    CompanyId
);
