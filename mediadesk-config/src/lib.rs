//! Configuration for the Mediadesk server.
//!
//! Values come from three layers, highest precedence first: process
//! environment (optionally seeded from a `.env` file), a TOML file, and
//! built-in defaults. The composed [`Config`] is checked by the guard rails
//! in [`validation`] before it is handed to the server.
#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError};
pub use models::{
    ADMIN_ROLE, AuthConfig, Config, ConfigMetadata, DatabaseConfig, NetworkConfig, ServerConfig,
    UiConfig, UserConfig,
};
pub use sources::{EnvConfig, FileConfig};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
