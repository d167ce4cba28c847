//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::UserId;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Entity was created
    Create,
    /// Entity was overwritten under the same id
    Replace,
    /// Entity was deleted
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Replace => write!(f, "REPLACE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Transaction,
    Budget,
    Profile,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::Budget => write!(f, "Budget"),
            EntityType::Profile => write!(f, "Profile"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// Owner of the affected data
    pub user_id: UserId,

    pub entity_type: EntityType,

    /// ID of the affected entity (or a description for bulk deletes)
    pub entity_id: String,

    /// Short label, e.g. "Monthly overall" or a category name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Stored value after the operation (creates and replaces)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl AuditEntry {
    fn new<T: Serialize>(
        operation: Operation,
        user_id: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        value: Option<&T>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            user_id: user_id.clone(),
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            value: value.and_then(|v| serde_json::to_value(v).ok()),
        }
    }

    /// Entry for a newly stored entity
    pub fn create<T: Serialize>(
        user_id: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self::new(
            Operation::Create,
            user_id,
            entity_type,
            entity_id,
            entity_name,
            Some(entity),
        )
    }

    /// Entry for an entity overwritten in place
    pub fn replace<T: Serialize>(
        user_id: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self::new(
            Operation::Replace,
            user_id,
            entity_type,
            entity_id,
            entity_name,
            Some(entity),
        )
    }

    /// Entry for a deletion
    pub fn delete(
        user_id: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> Self {
        Self::new::<()>(
            Operation::Delete,
            user_id,
            entity_type,
            entity_id,
            entity_name,
            None,
        )
    }

    /// One-line summary for terminal output
    pub fn format_human_readable(&self) -> String {
        let name = self
            .entity_name
            .as_ref()
            .map(|n| format!(" \"{}\"", n))
            .unwrap_or_default();

        format!(
            "[{}] {} {} {}{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id,
            name
        )
    }
}
