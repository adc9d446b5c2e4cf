use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    response::{Redirect, Response},
};
use mediadesk_core::{
    ActionError, ActionParams, WorkAction, WorkActionRequest,
    database::ports::works::ActionLogEntry,
};
use mediadesk_model::WorkId;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use url::form_urlencoded;

use crate::infra::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::{AppError, AppResult},
};
use crate::views::{
    View,
    works::{self as works_view, WorksModel},
};

pub const WORKS_PATH: &str = "/works";

const RECENT_ACTIONS_LIMIT: u32 = 50;

#[derive(Debug, Default, Deserialize)]
pub struct ListWorksQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// `GET /works`
pub async fn list_works(
    State(state): State<AppState>,
    Query(query): Query<ListWorksQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let request = state.works.paging().request(query.page, query.size);
    let listing = state.works.list(query.search.as_deref(), request).await?;

    let model = WorksModel {
        page: listing.page,
        search: listing.search.map(|s| s.to_string()),
        networks: state.works.networks().allowed().to_vec(),
    };

    Ok(View::new(works_view::VIEW_NAME, model).negotiate(&headers, works_view::render))
}

/// `POST /works`
pub async fn update_works(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Bytes,
) -> AppResult<Redirect> {
    let request = WorkActionForm::parse(&body)?.into_request()?;
    let outcome = state.works.apply(request, Some(&user.username)).await?;

    info!(
        action = outcome.action,
        requested = outcome.requested,
        affected = outcome.affected,
        user = %user.username,
        "work action completed"
    );

    Ok(Redirect::to(WORKS_PATH))
}

/// `GET /works/log`
pub async fn recent_actions(State(state): State<AppState>) -> AppResult<Json<Vec<ActionLogEntry>>> {
    let entries = state.works.recent_actions(RECENT_ACTIONS_LIMIT).await?;
    Ok(Json(entries))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("missing 'action' field")]
    MissingAction,
    #[error(transparent)]
    Action(#[from] ActionError),
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        AppError::bad_request(err.to_string())
    }
}

/// The bulk action form: repeated `workIds`, one `action` and any number of
/// `params[<key>]` entries. Ids echo what the list rendered, so they are
/// taken verbatim.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WorkActionForm {
    pub work_ids: Vec<WorkId>,
    pub action: Option<String>,
    pub params: ActionParams,
}

impl WorkActionForm {
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        let mut form = Self::default();

        for (key, value) in form_urlencoded::parse(body) {
            match &*key {
                "workIds" | "workIds[]" => {
                    if !value.trim().is_empty() {
                        form.work_ids.push(WorkId::from_stored(value.into_owned()));
                    }
                }
                "action" => form.action = Some(value.into_owned()),
                other => {
                    if let Some(name) = other
                        .strip_prefix("params[")
                        .and_then(|rest| rest.strip_suffix(']'))
                    {
                        form.params.insert(name, value.into_owned());
                    }
                }
            }
        }

        Ok(form)
    }

    pub fn into_request(self) -> Result<WorkActionRequest, FormError> {
        let name = self
            .action
            .filter(|name| !name.trim().is_empty())
            .ok_or(FormError::MissingAction)?;
        let action = WorkAction::parse(&name, &self.params)?;
        Ok(WorkActionRequest::new(self.work_ids, action))
    }
}
