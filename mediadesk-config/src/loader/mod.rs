pub mod error;

use once_cell::sync::Lazy;
use std::{fs, path::PathBuf};

use crate::models::{
    ADMIN_ROLE, AuthConfig, Config, ConfigMetadata, DatabaseConfig, NetworkConfig, ServerConfig,
    UiConfig, UserConfig,
};
use crate::sources::{EnvConfig, FileConfig};
use crate::validation::{self, ConfigWarnings};
use error::ConfigLoadError;

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("mediadesk.toml"),
        PathBuf::from("config/mediadesk.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Load `.env`, read the process environment and the config file, then
    /// compose and validate.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(ignore_missing)?,
            None => dotenvy::dotenv().map(|_| true).or_else(ignore_missing)?,
        };

        self.load_with_env(EnvConfig::gather(), env_file_loaded)
    }

    /// Same as [`load`](Self::load) but with a caller-supplied environment.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let metadata = ConfigMetadata {
            config_path,
            env_file_loaded,
        };
        compose(file_config, env, metadata)
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        // Explicit and env-provided paths must exist; defaults are tried in order.
        let (path, required) = if let Some(explicit) = &self.options.config_path {
            (Some(explicit.clone()), true)
        } else if let Some(from_env) = &env.config_path {
            (Some(from_env.clone()), true)
        } else {
            let found = DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
                .cloned();
            (found, false)
        };

        let Some(path) = path else {
            return Ok((None, None));
        };

        if !path.exists() {
            if required {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigLoadError::Io {
            path: path.clone(),
            source,
        })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok((Some(file_config), Some(path)))
    }
}

fn ignore_missing(err: dotenvy::Error) -> Result<bool, dotenvy::Error> {
    match err {
        dotenvy::Error::Io(_) => Ok(false),
        other => Err(other),
    }
}

/// Merge file values and environment overrides over the defaults, then run
/// the guard rails.
pub fn compose(
    file: Option<FileConfig>,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> Result<ConfigLoad, ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if file.is_none() {
        warnings.push_with_hint(
            "No mediadesk.toml detected; falling back to environment variables",
            "Create mediadesk.toml or point MEDIADESK_CONFIG at a config file",
        );
    }

    let FileConfig {
        server: file_server,
        database: file_database,
        networks: file_networks,
        ui: file_ui,
        auth: file_auth,
        dev_mode: file_dev_mode,
    } = file.unwrap_or_default();

    let server_defaults = ServerConfig::default();
    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or(server_defaults.host),
        port: env.server_port.or(file_server.port).unwrap_or(server_defaults.port),
    };

    let database = DatabaseConfig {
        url: env.database_url.or(file_database.url),
    };

    let network_defaults = NetworkConfig::default();
    let networks = NetworkConfig {
        allowed: env
            .allowed_networks
            .or(file_networks.allowed)
            .unwrap_or(network_defaults.allowed),
        default: env
            .default_network
            .or(file_networks.default)
            .unwrap_or(network_defaults.default),
    };

    let ui_defaults = UiConfig::default();
    let ui = UiConfig {
        page_size: env.page_size.or(file_ui.page_size).unwrap_or(ui_defaults.page_size),
        max_page_size: env
            .max_page_size
            .or(file_ui.max_page_size)
            .unwrap_or(ui_defaults.max_page_size),
    };

    let mut users: Vec<UserConfig> = file_auth
        .users
        .into_iter()
        .map(|user| UserConfig {
            username: user.username,
            password_hash: user.password_hash,
            roles: user.roles,
        })
        .collect();

    match (env.admin_username, env.admin_password_hash) {
        (Some(username), Some(password_hash)) => {
            users.retain(|user| user.username != username);
            users.push(UserConfig {
                username,
                password_hash,
                roles: vec![ADMIN_ROLE.to_string()],
            });
        }
        (Some(_), None) | (None, Some(_)) => warnings.push_with_hint(
            "Only one of ADMIN_USERNAME / ADMIN_PASSWORD_HASH is set; ignoring both",
            "Set both variables to configure the admin login from the environment",
        ),
        (None, None) => {}
    }

    let config = Config {
        server,
        database,
        networks,
        ui,
        auth: AuthConfig { users },
        dev_mode: env.dev_mode.or(file_dev_mode).unwrap_or(false),
        metadata,
    };

    let guard_warnings = validation::apply_guard_rails(&config)?;
    warnings.extend(guard_warnings);

    Ok(ConfigLoad { config, warnings })
}
