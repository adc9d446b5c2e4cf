use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::collection::Collection;
use crate::ids::WorkId;
use crate::network;

/// A digitized media object as seen by the administration surface.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Work {
    pub id: WorkId,
    pub title: String,
    /// Alternative identifier used by the hosting system for alias lookup.
    #[cfg_attr(feature = "serde", serde(default))]
    pub host_id: Option<String>,
    pub allowed_network: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub index_time: Option<DateTime<Utc>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub collections: BTreeSet<Collection>,
}

impl Work {
    pub fn new(id: WorkId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            host_id: None,
            allowed_network: network::DEFAULT.to_string(),
            index_time: None,
            collections: BTreeSet::new(),
        }
    }

    pub fn with_host_id(mut self, host_id: impl Into<String>) -> Self {
        self.host_id = Some(host_id.into());
        self
    }

    pub fn with_allowed_network(mut self, network: impl Into<String>) -> Self {
        self.allowed_network = network.into();
        self
    }

    pub fn with_index_time(mut self, index_time: DateTime<Utc>) -> Self {
        self.index_time = Some(index_time);
        self
    }

    pub fn with_collections<I>(mut self, collections: I) -> Self
    where
        I: IntoIterator<Item = Collection>,
    {
        self.collections = collections.into_iter().collect();
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.allowed_network == network::DISABLED
    }

    pub fn collection_ids(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.id.as_str())
    }
}
