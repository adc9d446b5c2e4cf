use axum::{
    Router, middleware,
    response::Redirect,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    health::{health_handler, ping_handler},
    works::{WORKS_PATH, list_works, recent_actions, update_works},
};
use crate::infra::{app_state::AppState, auth::require_admin};

/// Admin routes; every one requires an ADMIN login.
pub fn create_works_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(WORKS_PATH, get(list_works).post(update_works))
        .route("/works/log", get(recent_actions))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to(WORKS_PATH) }))
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .merge(create_works_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
