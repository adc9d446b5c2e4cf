pub mod app_state;
pub mod auth;
pub mod errors;
pub mod startup;
