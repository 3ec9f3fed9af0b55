//! Serializable views of scopes for diagnostics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use crate::context::ContextStatus;

/// A scope as it was when the snapshot was taken.
///
/// Produced by `Context::snapshot`; JSON-serializable without loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub lineage: Vec<String>,
    pub status: ContextStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub data: HashMap<String, Value>,
}

impl ContextSnapshot {
    /// Lineage joined with `separator`, e.g. `main-funcA-funcB`
    pub fn path(&self, separator: &str) -> String {
        self.lineage.join(separator)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
