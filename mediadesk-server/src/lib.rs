//! # Mediadesk Server
//!
//! Administration surface for works: a searchable, paginated list at
//! `GET /works` and bulk network changes through `POST /works`, guarded by
//! HTTP Basic authentication against the configured ADMIN users.

pub mod handlers;
pub mod infra;
pub mod routes;
pub mod views;

pub use infra::app_state::AppState;
pub use routes::create_app;
