//! # Mediadesk Core
//!
//! Work administration for the media server: parsing of list searches and
//! bulk actions, the repository ports they run against, and the PostgreSQL
//! and in-memory adapters behind those ports.
//!
//! ## Feature Flags
//!
//! - `database`: PostgreSQL adapter, migrations and [`MIGRATOR`] (default)
//! - `e2e`: repository tests that need a live `DATABASE_URL`
//!
//! ## Layout
//!
//! - [`search`]: `field:term` search expressions
//! - [`actions`]: bulk action parsing (`set-network`)
//! - [`database`]: ports and adapters
//! - [`application`]: [`AppUnitOfWork`] and [`WorkService`]

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod actions;
pub mod application;
pub mod database;
pub mod error;
pub mod search;

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use actions::{
    ActionError, ActionOutcome, ActionParams, SetNetwork, WorkAction, WorkActionRequest,
};
pub use application::{AppUnitOfWork, NetworkPolicy, PagingPolicy, WorkListing, WorkService};
pub use error::{MediaError, Result};
pub use search::{SearchField, WorkSearch};

pub use mediadesk_model as model;
