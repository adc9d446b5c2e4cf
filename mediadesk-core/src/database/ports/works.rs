use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mediadesk_model::{Page, PageRequest, Work, WorkId};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::search::WorkSearch;

/// Audit metadata written together with a bulk change.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionAudit {
    pub action: String,
    pub parameters: Value,
    pub performed_by: Option<String>,
}

/// A stored action log entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLogEntry {
    pub id: i64,
    pub action: String,
    pub work_ids: Vec<String>,
    pub parameters: Value,
    pub performed_by: Option<String>,
    pub performed_at: DateTime<Utc>,
    pub affected: i64,
}

#[async_trait]
pub trait WorksReadPort: Send + Sync {
    async fn get_by_id(&self, id: &WorkId) -> Result<Option<Work>>;

    /// Works ordered by id, optionally filtered. Collections are populated.
    async fn search(
        &self,
        search: Option<&WorkSearch>,
        page: PageRequest,
    ) -> Result<Page<Work>>;

    async fn count(&self) -> Result<u64>;

    /// Newest entries first.
    async fn recent_actions(&self, limit: u32) -> Result<Vec<ActionLogEntry>>;
}

#[async_trait]
pub trait WorksWritePort: Send + Sync {
    /// Insert or replace a work together with its collection memberships.
    async fn save(&self, work: &Work) -> Result<()>;

    /// Assign `network` to every listed work that exists and record `audit`
    /// in the same unit. Returns the number of works touched.
    async fn set_allowed_network(
        &self,
        work_ids: &[WorkId],
        network: &str,
        audit: &ActionAudit,
    ) -> Result<u64>;
}
