//! Bulk actions applied to a selection of works.
//!
//! The list view posts an action name plus a free-form `params[...]` map.
//! Parsing turns that into a typed [`WorkAction`]; anything the action does
//! not understand is rejected before the datastore is touched.

use std::collections::BTreeMap;

use mediadesk_model::WorkId;
use serde_json::{Value, json};
use thiserror::Error;

pub const SET_NETWORK: &str = "set-network";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("action '{action}' requires parameter '{name}'")]
    MissingParameter { action: &'static str, name: &'static str },
    #[error("parameter '{name}' has invalid value '{value}': {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("network '{0}' is not an allowed network")]
    NetworkNotAllowed(String),
}

/// Raw `params[key]` values as submitted by the form.
///
/// Empty values are kept but read back as absent, matching how the form
/// submits untouched optional inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionParams(BTreeMap<String, String>);

impl ActionParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Trimmed value, `None` when missing or blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ActionParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Change the access network of every selected work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetNetwork {
    pub network: String,
    /// Free-text justification, recorded in the action log.
    pub comment: Option<String>,
    /// Request that delivery files be reduced along with the change. The
    /// flag is recorded; reduction itself happens downstream.
    pub reduce: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkAction {
    SetNetwork(SetNetwork),
}

impl WorkAction {
    pub fn parse(name: &str, params: &ActionParams) -> Result<Self, ActionError> {
        match name.trim() {
            SET_NETWORK => {
                let network = params.get("network").ok_or(
                    ActionError::MissingParameter {
                        action: SET_NETWORK,
                        name: "network",
                    },
                )?;
                let reduce = match params.get("reduce") {
                    Some(raw) => parse_flag("reduce", raw)?,
                    None => false,
                };

                Ok(Self::SetNetwork(SetNetwork {
                    network: network.to_string(),
                    comment: params.get("comment").map(str::to_string),
                    reduce,
                }))
            }
            other => Err(ActionError::UnknownAction(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SetNetwork(_) => SET_NETWORK,
        }
    }

    /// Parameter snapshot stored alongside the action log entry.
    pub fn parameters(&self) -> Value {
        match self {
            Self::SetNetwork(change) => json!({
                "network": change.network,
                "comment": change.comment,
                "reduce": change.reduce,
            }),
        }
    }
}

/// A parsed bulk action plus the works it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkActionRequest {
    pub work_ids: Vec<WorkId>,
    pub action: WorkAction,
}

impl WorkActionRequest {
    /// Duplicate ids are collapsed, first occurrence wins.
    pub fn new(work_ids: Vec<WorkId>, action: WorkAction) -> Self {
        let mut seen = std::collections::HashSet::new();
        let work_ids = work_ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        Self { work_ids, action }
    }
}

/// Result of a bulk action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    pub action: &'static str,
    pub requested: usize,
    pub affected: u64,
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ActionError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ActionError::InvalidParameter {
            name,
            value: raw.to_string(),
            reason: "expected a boolean",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_network_with_empty_optionals() {
        let params = ActionParams::new()
            .with("network", "disabled")
            .with("comment", "")
            .with("reduce", "");

        let action = WorkAction::parse("set-network", &params).unwrap();
        assert_eq!(
            action,
            WorkAction::SetNetwork(SetNetwork {
                network: "disabled".into(),
                comment: None,
                reduce: false,
            })
        );
        assert_eq!(action.name(), SET_NETWORK);
    }

    #[test]
    fn set_network_keeps_comment_and_reduce() {
        let params = ActionParams::new()
            .with("network", " disabled ")
            .with("comment", "rights expired")
            .with("reduce", "on");

        let WorkAction::SetNetwork(change) =
            WorkAction::parse("set-network", &params).unwrap();
        assert_eq!(change.network, "disabled");
        assert_eq!(change.comment.as_deref(), Some("rights expired"));
        assert!(change.reduce);
    }

    #[test]
    fn missing_network_is_rejected() {
        let params = ActionParams::new().with("network", "  ");
        assert_eq!(
            WorkAction::parse("set-network", &params),
            Err(ActionError::MissingParameter {
                action: SET_NETWORK,
                name: "network",
            })
        );
    }

    #[test]
    fn garbage_reduce_flag_is_rejected() {
        let params = ActionParams::new()
            .with("network", "global")
            .with("reduce", "maybe");
        assert!(matches!(
            WorkAction::parse("set-network", &params),
            Err(ActionError::InvalidParameter { name: "reduce", .. })
        ));
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert_eq!(
            WorkAction::parse("delete", &ActionParams::new()),
            Err(ActionError::UnknownAction("delete".into()))
        );
    }

    #[test]
    fn parameters_snapshot_is_json() {
        let params = ActionParams::new().with("network", "disabled");
        let action = WorkAction::parse("set-network", &params).unwrap();
        assert_eq!(
            action.parameters(),
            json!({"network": "disabled", "comment": null, "reduce": false})
        );
    }

    #[test]
    fn request_collapses_duplicate_ids() {
        let ids = ["work2", "work1", "work2"]
            .into_iter()
            .map(|id| WorkId::new(id).unwrap())
            .collect();
        let action = WorkAction::parse(
            "set-network",
            &ActionParams::new().with("network", "global"),
        )
        .unwrap();
        let request = WorkActionRequest::new(ids, action);
        let ids: Vec<_> = request.work_ids.iter().map(WorkId::as_str).collect();
        assert_eq!(ids, vec!["work2", "work1"]);
    }
}
