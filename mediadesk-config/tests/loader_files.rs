use std::io::Write;

use mediadesk_config::{ConfigLoadError, ConfigLoader, EnvConfig};

const HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA";

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn explicit_file_is_loaded() {
    let file = write_config(&format!(
        r#"
        [server]
        port = 8088

        [database]
        url = "postgres://localhost/mediadesk"

        [networks]
        allowed = ["global", "disabled", "campus"]
        default = "campus"

        [ui]
        page_size = 50

        [[auth.users]]
        username = "curator"
        password_hash = "{HASH}"
        roles = ["ADMIN"]
        "#
    ));

    let load = ConfigLoader::new()
        .with_config_path(file.path())
        .load_with_env(EnvConfig::default(), false)
        .expect("config loads");

    let config = load.config;
    assert_eq!(config.server.port, 8088);
    assert_eq!(config.networks.default, "campus");
    assert_eq!(config.ui.page_size, 50);
    assert_eq!(config.ui.max_page_size, 200);
    assert!(config.auth.find("curator").is_some_and(|u| u.is_admin()));
    assert_eq!(config.metadata.config_path.as_deref(), Some(file.path()));
    assert!(load.warnings.is_empty());
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(EnvConfig::default(), false)
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { path: p } if p == path));
}

#[test]
fn env_config_path_is_honoured() {
    let file = write_config(&format!(
        r#"
        dev_mode = false

        [[auth.users]]
        username = "admin"
        password_hash = "{HASH}"
        roles = ["admin"]
        "#
    ));
    let env = EnvConfig {
        config_path: Some(file.path().to_path_buf()),
        ..EnvConfig::default()
    };

    let load = ConfigLoader::new()
        .load_with_env(env, false)
        .expect("config loads");
    assert!(load.config.auth.has_admin());
    // Only the in-memory store warning remains.
    assert_eq!(load.warnings.items.len(), 1);
}

#[test]
fn malformed_toml_reports_the_path() {
    let file = write_config("[server\nport = 1");

    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .load_with_env(EnvConfig::default(), false)
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Parse { .. }));
    assert!(err.to_string().contains(&file.path().display().to_string()));
}
