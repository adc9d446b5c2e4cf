//! Work search expressions.
//!
//! The list view accepts a single free-text `search` parameter. A leading
//! `field:` selector narrows the match to one column; anything else is
//! matched against the id, the title and the ids of the collections a work
//! belongs to. Matching is a case-insensitive substring test everywhere.

use std::fmt;

use mediadesk_model::Work;

/// Column a search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// Id, title or any member collection id.
    Any,
    Id,
    Title,
    HostId,
    Collection,
}

impl SearchField {
    /// Resolve a `field:` selector. Selector names are case-insensitive.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix.trim().to_ascii_lowercase().as_str() {
            "id" => Some(Self::Id),
            "title" => Some(Self::Title),
            "hostid" => Some(Self::HostId),
            "collection" => Some(Self::Collection),
            _ => None,
        }
    }

    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Id => Some("id"),
            Self::Title => Some("title"),
            Self::HostId => Some("hostId"),
            Self::Collection => Some("collection"),
        }
    }
}

/// A parsed, non-empty search expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkSearch {
    field: SearchField,
    term: String,
}

impl WorkSearch {
    pub fn new(field: SearchField, term: impl Into<String>) -> Self {
        Self {
            field,
            term: term.into(),
        }
    }

    /// Parse the raw `search` parameter.
    ///
    /// Returns `None` when there is nothing to filter on: a blank string or a
    /// known selector with a blank term. An unknown selector such as
    /// `foo:bar` is not a selector at all, so the whole string becomes the
    /// term.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some((prefix, rest)) = raw.split_once(':')
            && let Some(field) = SearchField::from_prefix(prefix)
        {
            let term = rest.trim();
            if term.is_empty() {
                return None;
            }
            return Some(Self::new(field, term));
        }

        Some(Self::new(SearchField::Any, raw))
    }

    pub fn field(&self) -> SearchField {
        self.field
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// `%term%` with LIKE metacharacters escaped for `ESCAPE '\'`.
    pub fn like_pattern(&self) -> String {
        format!("%{}%", escape_like_literal(&self.term))
    }

    /// In-process evaluation with the same semantics as the SQL adapter.
    pub fn matches(&self, work: &Work) -> bool {
        let needle = self.term.to_lowercase();
        let hit = |haystack: &str| haystack.to_lowercase().contains(&needle);

        match self.field {
            SearchField::Any => {
                hit(work.id.as_str())
                    || hit(&work.title)
                    || work.collection_ids().any(hit)
            }
            SearchField::Id => hit(work.id.as_str()),
            SearchField::Title => hit(&work.title),
            SearchField::HostId => work.host_id.as_deref().is_some_and(hit),
            SearchField::Collection => work.collection_ids().any(hit),
        }
    }
}

impl fmt::Display for WorkSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field.prefix() {
            Some(prefix) => write!(f, "{prefix}:{}", self.term),
            None => f.write_str(&self.term),
        }
    }
}

pub fn escape_like_literal(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '%' => out.push_str("\\%"),
            '_' => out.push_str("\\_"),
            other => out.push(other),
        }
    }
    out
}
