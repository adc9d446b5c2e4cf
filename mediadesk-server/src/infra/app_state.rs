use std::{fmt, sync::Arc};

use mediadesk_config::Config;
use mediadesk_core::{
    AppUnitOfWork, NetworkPolicy, PagingPolicy, WorkService, database::PostgresDatabase,
};

use crate::infra::auth::{UserDirectory, crypto::PasswordCrypto};

#[derive(Clone)]
pub struct AppState {
    pub unit_of_work: Arc<AppUnitOfWork>,
    pub works: Arc<WorkService>,
    pub postgres: Option<Arc<PostgresDatabase>>,
    pub users: Arc<UserDirectory>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("unit_of_work", &self.unit_of_work)
            .field("postgres", &self.postgres.is_some())
            .field("users", &self.users.len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        unit_of_work: Arc<AppUnitOfWork>,
        postgres: Option<Arc<PostgresDatabase>>,
        crypto: PasswordCrypto,
    ) -> Self {
        let networks = NetworkPolicy::new(
            config.networks.allowed.clone(),
            config.networks.default.clone(),
        );
        let paging = PagingPolicy {
            default_size: config.ui.page_size,
            max_size: config.ui.max_page_size,
        };
        let works = Arc::new(WorkService::new(unit_of_work.clone(), networks, paging));
        let users = Arc::new(UserDirectory::new(&config.auth, crypto));

        Self {
            unit_of_work,
            works,
            postgres,
            users,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
