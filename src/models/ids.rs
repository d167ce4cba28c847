//! Strongly-typed ID wrappers
//!
//! Row identities are SQLite integer keys; the user identity is an opaque
//! string handed out by the identity provider. Newtypes keep them from being
//! mixed up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate row ID newtype wrappers
macro_rules! define_row_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap an existing row id
            pub const fn from_raw(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying row id
            pub const fn raw(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_row_id!(TransactionId, "txn-");
define_row_id!(BudgetId, "bud-");

/// Opaque identifier of the signed-in user that owns every stored row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an identifier supplied by the identity provider
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh identifier for a locally created identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(TransactionId::from_raw(42).to_string(), "txn-42");
        assert_eq!(BudgetId::from_raw(7).to_string(), "bud-7");
    }

    #[test]
    fn test_id_parse() {
        assert_eq!("txn-42".parse::<TransactionId>().unwrap().raw(), 42);
        assert_eq!("42".parse::<TransactionId>().unwrap().raw(), 42);
        assert!("txn-abc".parse::<TransactionId>().is_err());
    }

    #[test]
    fn test_id_serialization() {
        let id = BudgetId::from_raw(3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "3");
        let deserialized: BudgetId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_generated_user_ids_differ() {
        let a = UserId::generate();
        let b = UserId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }
}
