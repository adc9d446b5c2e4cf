//! Core data model definitions shared across Mediadesk crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod collection;
pub mod error;
pub mod ids;
pub mod network;
pub mod page;
pub mod work;

pub use collection::Collection;
pub use error::{ModelError, Result as ModelResult};
pub use ids::{CollectionId, WorkId};
pub use page::{Page, PageRequest};
pub use work::Work;
