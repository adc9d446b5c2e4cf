use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub networks: FileNetworksConfig,
    #[serde(default)]
    pub ui: FileUiConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileNetworksConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileUiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_page_size: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<FileUserConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileUserConfig {
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub allowed_networks: Option<Vec<String>>,
    pub default_network: Option<String>,
    pub page_size: Option<u32>,
    pub max_page_size: Option<u32>,
    pub admin_username: Option<String>,
    pub admin_password_hash: Option<String>,
    pub dev_mode: Option<bool>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `gather` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            config_path: text("MEDIADESK_CONFIG").map(PathBuf::from),
            server_host: text("SERVER_HOST"),
            server_port: text("SERVER_PORT").and_then(|s| s.trim().parse().ok()),
            database_url: text("DATABASE_URL"),
            allowed_networks: text("ALLOWED_NETWORKS").map(|raw| parse_csv(&raw)),
            default_network: text("DEFAULT_NETWORK").map(|s| s.trim().to_string()),
            page_size: text("PAGE_SIZE").and_then(|s| s.trim().parse().ok()),
            max_page_size: text("MAX_PAGE_SIZE").and_then(|s| s.trim().parse().ok()),
            admin_username: text("ADMIN_USERNAME").map(|s| s.trim().to_string()),
            admin_password_hash: text("ADMIN_PASSWORD_HASH").map(|s| s.trim().to_string()),
            dev_mode: text("DEV_MODE").and_then(|s| parse_bool(&s)),
        }
    }
}

pub fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> EnvConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn reads_known_variables() {
        let env = env(&[
            ("SERVER_PORT", "8080"),
            ("ALLOWED_NETWORKS", "global, campus,,disabled"),
            ("DEV_MODE", "yes"),
            ("PAGE_SIZE", "50"),
        ]);
        assert_eq!(env.server_port, Some(8080));
        assert_eq!(
            env.allowed_networks,
            Some(vec!["global".into(), "campus".into(), "disabled".into()])
        );
        assert_eq!(env.dev_mode, Some(true));
        assert_eq!(env.page_size, Some(50));
        assert!(env.database_url.is_none());
    }

    #[test]
    fn blank_and_unparsable_values_are_ignored() {
        let env = env(&[("SERVER_PORT", "http"), ("DATABASE_URL", "  "), ("DEV_MODE", "maybe")]);
        assert!(env.server_port.is_none());
        assert!(env.database_url.is_none());
        assert!(env.dev_mode.is_none());
    }

    #[test]
    fn file_config_parses_users() {
        let parsed: FileConfig = toml::from_str(
            r#"
            dev_mode = true

            [networks]
            allowed = ["global", "disabled", "campus"]

            [[auth.users]]
            username = "admin"
            password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"
            roles = ["ADMIN"]
            "#,
        )
        .unwrap();
        assert_eq!(parsed.dev_mode, Some(true));
        assert_eq!(parsed.networks.allowed.as_ref().map(Vec::len), Some(3));
        assert_eq!(parsed.auth.users[0].roles, vec!["ADMIN".to_string()]);
    }
}
