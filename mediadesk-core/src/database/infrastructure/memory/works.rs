use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use mediadesk_model::{Page, PageRequest, Work, WorkId};
use tokio::sync::RwLock;

use crate::database::ports::works::{
    ActionAudit, ActionLogEntry, WorksReadPort, WorksWritePort,
};
use crate::error::Result;
use crate::search::WorkSearch;

#[derive(Debug, Default)]
struct WorksState {
    works: BTreeMap<WorkId, Work>,
    actions: Vec<ActionLogEntry>,
}

/// Works kept in a `BTreeMap`, so iteration order equals id order just like
/// the `ORDER BY id` of the SQL adapter.
#[derive(Debug, Default)]
pub struct InMemoryWorksRepository {
    state: RwLock<WorksState>,
}

impl InMemoryWorksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_works<I>(works: I) -> Self
    where
        I: IntoIterator<Item = Work>,
    {
        let repo = Self::new();
        {
            let mut state = repo.state.write().await;
            for work in works {
                state.works.insert(work.id.clone(), work);
            }
        }
        repo
    }
}

#[async_trait]
impl WorksReadPort for InMemoryWorksRepository {
    async fn get_by_id(&self, id: &WorkId) -> Result<Option<Work>> {
        Ok(self.state.read().await.works.get(id).cloned())
    }

    async fn search(
        &self,
        search: Option<&WorkSearch>,
        page: PageRequest,
    ) -> Result<Page<Work>> {
        let state = self.state.read().await;
        let matching: Vec<&Work> = state
            .works
            .values()
            .filter(|work| search.is_none_or(|s| s.matches(work)))
            .collect();

        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let content = matching
            .into_iter()
            .skip(offset)
            .take(page.size as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, page, total))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.state.read().await.works.len() as u64)
    }

    async fn recent_actions(&self, limit: u32) -> Result<Vec<ActionLogEntry>> {
        let state = self.state.read().await;
        Ok(state
            .actions
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WorksWritePort for InMemoryWorksRepository {
    async fn save(&self, work: &Work) -> Result<()> {
        self.state
            .write()
            .await
            .works
            .insert(work.id.clone(), work.clone());
        Ok(())
    }

    async fn set_allowed_network(
        &self,
        work_ids: &[WorkId],
        network: &str,
        audit: &ActionAudit,
    ) -> Result<u64> {
        let mut state = self.state.write().await;

        let mut affected = 0u64;
        for id in work_ids {
            if let Some(work) = state.works.get_mut(id) {
                work.allowed_network = network.to_string();
                affected += 1;
            }
        }

        let entry = ActionLogEntry {
            id: state.actions.len() as i64 + 1,
            action: audit.action.clone(),
            work_ids: work_ids.iter().map(|id| id.as_str().to_string()).collect(),
            parameters: audit.parameters.clone(),
            performed_by: audit.performed_by.clone(),
            performed_at: Utc::now(),
            affected: affected as i64,
        };
        state.actions.push(entry);

        Ok(affected)
    }
}
