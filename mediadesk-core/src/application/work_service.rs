use std::sync::Arc;

use mediadesk_model::{Page, PageRequest, Work, network};
use tracing::{debug, info, warn};

use crate::actions::{ActionError, ActionOutcome, WorkAction, WorkActionRequest};
use crate::application::unit_of_work::AppUnitOfWork;
use crate::database::ports::works::{ActionAudit, ActionLogEntry};
use crate::error::Result;
use crate::search::WorkSearch;

/// Network labels an administrator may assign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPolicy {
    allowed: Vec<String>,
    default: String,
}

impl NetworkPolicy {
    /// An empty `allowed` list accepts any label.
    pub fn new(allowed: Vec<String>, default: impl Into<String>) -> Self {
        Self {
            allowed,
            default: default.into(),
        }
    }

    pub fn permits(&self, network: &str) -> bool {
        self.allowed.is_empty() || self.allowed.iter().any(|n| n == network)
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn default_network(&self) -> &str {
        &self.default
    }
}

impl Default for NetworkPolicy {
    fn default() -> Self {
        Self::new(
            vec![network::GLOBAL.to_string(), network::DISABLED.to_string()],
            network::DEFAULT,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingPolicy {
    pub default_size: u32,
    pub max_size: u32,
}

impl PagingPolicy {
    pub const DEFAULT_MAX_SIZE: u32 = 200;

    /// Missing page means the first one, missing size the default; sizes
    /// above `max_size` are clamped.
    pub fn request(&self, page: Option<u32>, size: Option<u32>) -> PageRequest {
        PageRequest::new(page.unwrap_or(0), size.unwrap_or(self.default_size))
            .with_max_size(self.max_size)
    }
}

impl Default for PagingPolicy {
    fn default() -> Self {
        Self {
            default_size: PageRequest::DEFAULT_SIZE,
            max_size: Self::DEFAULT_MAX_SIZE,
        }
    }
}

/// One page of the work list together with the search that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkListing {
    pub page: Page<Work>,
    pub search: Option<WorkSearch>,
}

/// Listing and bulk administration of works.
#[derive(Debug, Clone)]
pub struct WorkService {
    uow: Arc<AppUnitOfWork>,
    networks: NetworkPolicy,
    paging: PagingPolicy,
}

impl WorkService {
    pub fn new(uow: Arc<AppUnitOfWork>, networks: NetworkPolicy, paging: PagingPolicy) -> Self {
        Self {
            uow,
            networks,
            paging,
        }
    }

    pub fn networks(&self) -> &NetworkPolicy {
        &self.networks
    }

    pub fn paging(&self) -> PagingPolicy {
        self.paging
    }

    pub async fn list(&self, raw_search: Option<&str>, request: PageRequest) -> Result<WorkListing> {
        let search = raw_search.and_then(WorkSearch::parse);
        let request = request.with_max_size(self.paging.max_size);

        let page = self.uow.works_read.search(search.as_ref(), request).await?;
        debug!(
            search = ?search.as_ref().map(ToString::to_string),
            page = page.number,
            total = page.total_elements,
            "listed works"
        );

        Ok(WorkListing { page, search })
    }

    pub async fn count(&self) -> Result<u64> {
        self.uow.works_read.count().await
    }

    pub async fn recent_actions(&self, limit: u32) -> Result<Vec<ActionLogEntry>> {
        self.uow.works_read.recent_actions(limit).await
    }

    /// Apply a bulk action. Validation happens before any write; an empty
    /// selection is a no-op and leaves no audit entry.
    pub async fn apply(
        &self,
        request: WorkActionRequest,
        performed_by: Option<&str>,
    ) -> Result<ActionOutcome> {
        let action_name = request.action.name();
        let requested = request.work_ids.len();

        match &request.action {
            WorkAction::SetNetwork(change) => {
                if !self.networks.permits(&change.network) {
                    warn!(network = %change.network, "rejected set-network to unknown network");
                    return Err(ActionError::NetworkNotAllowed(change.network.clone()).into());
                }

                if request.work_ids.is_empty() {
                    debug!(action = action_name, "no works selected");
                    return Ok(ActionOutcome {
                        action: action_name,
                        requested,
                        affected: 0,
                    });
                }

                let audit = ActionAudit {
                    action: action_name.to_string(),
                    parameters: request.action.parameters(),
                    performed_by: performed_by.map(str::to_string),
                };
                let affected = self
                    .uow
                    .works_write
                    .set_allowed_network(&request.work_ids, &change.network, &audit)
                    .await?;

                info!(
                    action = action_name,
                    network = %change.network,
                    reduce = change.reduce,
                    requested,
                    affected,
                    user = performed_by.unwrap_or("-"),
                    "applied work action"
                );

                Ok(ActionOutcome {
                    action: action_name,
                    requested,
                    affected,
                })
            }
        }
    }
}
