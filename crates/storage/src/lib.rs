pub mod credentials;
pub mod dto;
pub mod error;
pub mod models;
pub mod repository;

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use credentials::DatabaseCredentials;
pub use error::{Result, StorageError};
pub use repository::CategoryStore;

/// Connection pool limits. The acquire timeout bounds every round trip that
/// waits on the pool, which is the only place a request can block.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect using a `postgres://` URL.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(PoolSettings::default().max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Connect using credentials handed over by a secret provider.
    pub async fn connect(credentials: &DatabaseCredentials, settings: &PoolSettings) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(credentials.connect_options())
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
