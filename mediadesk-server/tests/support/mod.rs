#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Result, anyhow};
use argon2::ParamsBuilder;
use axum_test::TestServer;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use mediadesk_config::{AuthConfig, Config, UserConfig};
use mediadesk_core::{
    AppUnitOfWork,
    database::infrastructure::memory::InMemoryWorksRepository,
    model::{Collection, CollectionId, Work, WorkId},
};
use mediadesk_server::{AppState, create_app, infra::auth::crypto::PasswordCrypto};

pub const ADMIN: (&str, &str) = ("admin", "admin-password");
pub const VIEWER: (&str, &str) = ("viewer", "viewer-password");

pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<InMemoryWorksRepository>,
    pub state: AppState,
}

pub fn work(id: &str, title: &str) -> Work {
    Work::new(WorkId::new(id).unwrap(), title)
}

pub fn collection(id: &str) -> Collection {
    Collection::new(CollectionId::new(id).unwrap())
}

pub fn basic(credentials: (&str, &str)) -> String {
    let (user, password) = credentials;
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

pub fn admin() -> String {
    basic(ADMIN)
}

/// Argon2 with the smallest parameters it accepts; production cost is not
/// the point of these tests.
fn cheap_crypto() -> Result<PasswordCrypto> {
    let params = ParamsBuilder::new()
        .m_cost(argon2::Params::MIN_M_COST.max(8))
        .t_cost(1)
        .p_cost(1)
        .build()
        .map_err(|err| anyhow!(err.to_string()))?;
    Ok(PasswordCrypto::with_params(params)?)
}

fn user(crypto: &PasswordCrypto, (name, password): (&str, &str), role: &str) -> Result<UserConfig> {
    Ok(UserConfig {
        username: name.to_string(),
        password_hash: crypto.hash_password(password)?,
        roles: vec![role.to_string()],
    })
}

pub async fn build_test_app(works: Vec<Work>) -> Result<TestApp> {
    build_test_app_with(works, Config::default()).await
}

pub async fn build_test_app_with(works: Vec<Work>, mut config: Config) -> Result<TestApp> {
    let crypto = cheap_crypto()?;
    config.auth = AuthConfig {
        users: vec![
            user(&crypto, ADMIN, "ADMIN")?,
            user(&crypto, VIEWER, "VIEWER")?,
        ],
    };

    let repo = Arc::new(InMemoryWorksRepository::with_works(works).await);
    let unit_of_work = Arc::new(AppUnitOfWork::from_memory(repo.clone()));
    let state = AppState::new(Arc::new(config), unit_of_work, None, crypto);

    let server =
        TestServer::new(create_app(state.clone())).map_err(|err| anyhow!(err.to_string()))?;

    Ok(TestApp {
        server,
        repo,
        state,
    })
}
