use std::{fmt, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::database::infrastructure::postgres::PostgresWorksRepository;
use crate::error::{MediaError, Result};

/// Statistics about the connection pool
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_size: u32,
    pub min_idle: u32,
}

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    max_connections: u32,
    min_connections: u32,
    works: PostgresWorksRepository,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn new(connection_string: &str) -> Result<Self> {
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let min_connections = std::env::var("DB_MIN_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(1)
            .min(max_connections);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(connection_string)
            .await
            .map_err(|e| MediaError::Internal(format!("Database connection failed: {e}")))?;

        info!(
            "Database pool initialized with max_connections={}, min_connections={}",
            max_connections, min_connections
        );

        Ok(Self::with_limits(pool, max_connections, min_connections))
    }

    /// Wrap an existing pool, e.g. the one handed out by `#[sqlx::test]`.
    pub fn from_pool(pool: PgPool) -> Self {
        let max = pool.options().get_max_connections();
        let min = pool.options().get_min_connections();
        Self::with_limits(pool, max, min)
    }

    fn with_limits(pool: PgPool, max_connections: u32, min_connections: u32) -> Self {
        let works = PostgresWorksRepository::new(pool.clone());
        Self {
            pool,
            max_connections,
            min_connections,
            works,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn works_repository(&self) -> PostgresWorksRepository {
        self.works.clone()
    }

    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle() as u32,
            max_size: self.max_connections,
            min_idle: self.min_connections,
        }
    }

    /// `SELECT 1` round trip, checked by `/health` alongside the pool stats.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| MediaError::Internal(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    pub async fn initialize_schema(&self) -> Result<()> {
        crate::MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| MediaError::Internal(format!("Migration failed: {e}")))?;

        info!("Database schema is up to date");
        Ok(())
    }
}
