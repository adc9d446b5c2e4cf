use std::path::PathBuf;

use mediadesk_model::network;

/// Role required for the work administration routes.
pub const ADMIN_ROLE: &str = "ADMIN";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 200;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub networks: NetworkConfig,
    pub ui: UiConfig,
    pub auth: AuthConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// `None` runs the server on the in-memory store.
    pub url: Option<String>,
}

/// Network labels offered by the bulk `set-network` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub allowed: Vec<String>,
    pub default: String,
}

impl NetworkConfig {
    pub fn contains(&self, label: &str) -> bool {
        self.allowed.iter().any(|n| n == label)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            allowed: vec![network::GLOBAL.to_string(), network::DISABLED.to_string()],
            default: network::DEFAULT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiConfig {
    pub page_size: u32,
    pub max_page_size: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub users: Vec<UserConfig>,
}

impl AuthConfig {
    pub fn has_admin(&self) -> bool {
        self.users.iter().any(UserConfig::is_admin)
    }

    pub fn find(&self, username: &str) -> Option<&UserConfig> {
        self.users.iter().find(|user| user.username == username)
    }
}

/// A login allowed to reach the admin surface.
#[derive(Clone, PartialEq, Eq)]
pub struct UserConfig {
    pub username: String,
    /// Argon2 PHC string, e.g. produced by `mediadesk-server hash-password`.
    pub password_hash: String,
    pub roles: Vec<String>,
}

impl UserConfig {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role.eq_ignore_ascii_case(ADMIN_ROLE))
    }
}

impl std::fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserConfig")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
