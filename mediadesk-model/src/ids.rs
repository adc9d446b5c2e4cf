use crate::error::{ModelError, Result};

/// Upper bound shared by every string identifier column.
pub const MAX_ID_LEN: usize = 255;

fn validate(kind: &'static str, raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ModelError::EmptyIdentifier { kind });
    }
    if trimmed.chars().count() > MAX_ID_LEN {
        return Err(ModelError::IdentifierTooLong {
            kind,
            max: MAX_ID_LEN,
        });
    }
    Ok(trimmed.to_string())
}

/// Identifier of a digitized work, assigned upstream at ingestion time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct WorkId(String);

impl WorkId {
    /// Validate and wrap a raw identifier. Surrounding whitespace is dropped.
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        validate("work", raw.as_ref()).map(Self)
    }

    /// Wrap an identifier exactly as stored or submitted back by a client,
    /// without trimming or length checks. Only [`new`](Self::new) validates.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for WorkId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for WorkId {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

/// Identifier of a collection (a named grouping of works).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct CollectionId(String);

impl CollectionId {
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        validate("collection", raw.as_ref()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CollectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CollectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for CollectionId {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_id_trims_surrounding_whitespace() {
        let id = WorkId::new("  work1 ").unwrap();
        assert_eq!(id.as_str(), "work1");
    }

    #[test]
    fn blank_identifiers_are_rejected() {
        assert_eq!(
            WorkId::new("   "),
            Err(ModelError::EmptyIdentifier { kind: "work" })
        );
        assert_eq!(
            CollectionId::new(""),
            Err(ModelError::EmptyIdentifier { kind: "collection" })
        );
    }

    #[test]
    fn stored_identifiers_are_kept_verbatim() {
        let raw = format!(" {}", "x".repeat(MAX_ID_LEN + 10));
        let id = WorkId::from_stored(raw.clone());
        assert_eq!(id.as_str(), raw);
        assert!(WorkId::new(&raw).is_err());
    }

    #[test]
    fn overlong_identifiers_are_rejected() {
        let raw = "x".repeat(MAX_ID_LEN + 1);
        assert!(matches!(
            WorkId::new(&raw),
            Err(ModelError::IdentifierTooLong { .. })
        ));
        assert!(WorkId::new("x".repeat(MAX_ID_LEN)).is_ok());
    }
}
