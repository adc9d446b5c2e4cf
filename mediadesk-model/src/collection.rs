use crate::ids::CollectionId;

/// A named grouping of works. Membership is many-to-many and owned by the
/// work side; the backward relation is resolved through the repository.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collection {
    pub id: CollectionId,
}

impl Collection {
    pub fn new(id: CollectionId) -> Self {
        Self { id }
    }
}

impl From<CollectionId> for Collection {
    fn from(id: CollectionId) -> Self {
        Self::new(id)
    }
}
