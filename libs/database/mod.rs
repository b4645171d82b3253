//! Database client handle
//!
//! Turns a [`DatabaseConfig`] into a pooled connection for the selected
//! driver, and exposes read-only views of the migration ledger.

pub mod client;
pub mod pool;
pub mod status;
pub mod utils;

use db_config::{ConfigError, DatabaseConfig, MigrationError};
use thiserror::Error;
use tracing::{debug, info};

// Re-export main types
pub use client::{ClientKind, PoolSettings};
pub use pool::{ConnectTarget, DatabasePool};
pub use status::{CompletedMigration, MigrationStatus, MIGRATIONS_LOCK_TABLE, MIGRATIONS_TABLE};
pub use utils::init_tracing_with_level;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Migration error: {0}")]
    MigrationError(#[from] MigrationError),

    #[error("Unsupported database client: {0}")]
    UnsupportedClient(String),

    #[error("Invalid connection: {0}")]
    InvalidConnection(String),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Pooled database handle built from a [`DatabaseConfig`]
#[derive(Debug, Clone)]
pub struct Database {
    config: DatabaseConfig,
    pool: DatabasePool,
}

impl Database {
    /// Create the pool for the configured client
    ///
    /// The pool connects lazily, so an unreachable server is reported by
    /// the first query (see [`Database::ping`]), not here.
    pub async fn connect(config: DatabaseConfig) -> Result<Self> {
        let kind: ClientKind = config.client.parse()?;
        let target = ConnectTarget::resolve(kind, &config.connection)?;

        info!(
            client = %kind,
            target = %config.connection.display_target(),
            "Creating database pool"
        );

        let settings = kind.pool_settings();
        let pool = DatabasePool::open(kind, &target, &settings)?;

        debug!(
            min = settings.min_connections,
            max = settings.max_connections,
            "Database pool ready"
        );

        Ok(Self { config, pool })
    }

    /// Read configuration from the environment and connect
    pub async fn connect_from_env() -> Result<Self> {
        let config = DatabaseConfig::from_env()?;
        Self::connect(config).await
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn kind(&self) -> ClientKind {
        self.pool.kind()
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> Result<()> {
        match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
            DatabasePool::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
            DatabasePool::MySql(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
        }

        debug!("Database ping succeeded");
        Ok(())
    }

    // ==================== MIGRATION LEDGER ====================

    /// Migrations recorded as run, in the order they ran
    pub async fn completed_migrations(&self) -> Result<Vec<CompletedMigration>> {
        status::completed_migrations(&self.pool).await
    }

    /// Compare the ledger with the migration directory
    pub async fn migration_status(&self) -> Result<MigrationStatus> {
        let completed = self.completed_migrations().await?;
        let files = self.config.migrations.discover()?;
        let status = MigrationStatus::compare(completed, &files);

        debug!(
            completed = status.completed.len(),
            pending = status.pending.len(),
            missing = status.missing.len(),
            "Migration status computed"
        );

        Ok(status)
    }

    /// Whether migration tooling currently holds the migration lock
    pub async fn is_locked(&self) -> Result<bool> {
        status::is_locked(&self.pool).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
