use thiserror::Error;

use super::models::Config;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("invalid paging configuration: {reason}")]
    InvalidPaging { reason: String },
    #[error("no networks configured; ALLOWED_NETWORKS must name at least one label")]
    NoNetworks,
    #[error("default network '{0}' is not one of the allowed networks")]
    UnknownDefaultNetwork(String),
    #[error("no user with the ADMIN role configured while DEV_MODE is false")]
    MissingAdmin,
    #[error("password hash for user '{username}' is not an Argon2 PHC string")]
    InvalidPasswordHash { username: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(&mut self, message: S, hint: H) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(config: &Config) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let ui = &config.ui;
    if ui.page_size == 0 || ui.max_page_size == 0 {
        return Err(ConfigGuardRailError::InvalidPaging {
            reason: "page sizes must be positive".into(),
        });
    }
    if ui.page_size > ui.max_page_size {
        return Err(ConfigGuardRailError::InvalidPaging {
            reason: format!(
                "PAGE_SIZE ({}) exceeds MAX_PAGE_SIZE ({})",
                ui.page_size, ui.max_page_size
            ),
        });
    }

    let networks = &config.networks;
    if networks.allowed.is_empty() {
        return Err(ConfigGuardRailError::NoNetworks);
    }
    if !networks.contains(&networks.default) {
        return Err(ConfigGuardRailError::UnknownDefaultNetwork(
            networks.default.clone(),
        ));
    }
    if !networks.contains(mediadesk_model::network::DISABLED) {
        warnings.push_with_hint(
            "The 'disabled' network is not allowed; works cannot be withdrawn from delivery",
            "Add 'disabled' to ALLOWED_NETWORKS",
        );
    }

    for user in &config.auth.users {
        if !user.password_hash.starts_with("$argon2") {
            return Err(ConfigGuardRailError::InvalidPasswordHash {
                username: user.username.clone(),
            });
        }
    }

    if !config.auth.has_admin() {
        if !config.dev_mode {
            return Err(ConfigGuardRailError::MissingAdmin);
        }
        warnings.push_with_hint(
            "No ADMIN user configured; every request to /works will be rejected",
            "Set ADMIN_USERNAME and ADMIN_PASSWORD_HASH (see `mediadesk-server hash-password`)",
        );
    }

    if config.database.url.is_none() {
        warnings.push_with_hint(
            "DATABASE_URL not configured; works are kept in memory and lost on restart",
            "Set DATABASE_URL to a PostgreSQL connection string",
        );
    }

    Ok(warnings)
}
