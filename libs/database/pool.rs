//! Driver-specific connection pools

use crate::client::{ClientKind, PoolSettings};
use crate::{DatabaseError, Result};
use db_config::ConnectionDescriptor;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{MySqlPool, PgPool, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;

/// What a descriptor resolves to once the driver is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectTarget {
    /// SQLite database file, created on first connect
    SqliteFile(PathBuf),
    /// `sqlite:` URL parsed by the driver
    SqliteUrl(String),
    /// Server connection URL
    ServerUrl(String),
}

impl ConnectTarget {
    pub fn resolve(kind: ClientKind, connection: &ConnectionDescriptor) -> Result<Self> {
        match (kind, connection) {
            (ClientKind::Sqlite, ConnectionDescriptor::File { filename }) => {
                Ok(ConnectTarget::SqliteFile(PathBuf::from(filename)))
            }
            (ClientKind::Sqlite, ConnectionDescriptor::Url(value)) => {
                if value.starts_with("sqlite:") {
                    Ok(ConnectTarget::SqliteUrl(value.clone()))
                } else {
                    Ok(ConnectTarget::SqliteFile(PathBuf::from(value)))
                }
            }
            (_, ConnectionDescriptor::Url(value)) => Ok(ConnectTarget::ServerUrl(value.clone())),
            (_, ConnectionDescriptor::File { filename }) => {
                Err(DatabaseError::InvalidConnection(format!(
                    "{} client cannot open database file {}",
                    kind, filename
                )))
            }
        }
    }
}

/// Pool for whichever driver the configuration selected
#[derive(Debug, Clone)]
pub enum DatabasePool {
    Sqlite(SqlitePool),
    Postgres(PgPool),
    MySql(MySqlPool),
}

impl DatabasePool {
    /// Build a lazily connecting pool; no connection is made until first use
    pub(crate) fn open(kind: ClientKind, target: &ConnectTarget, settings: &PoolSettings) -> Result<Self> {
        let pool = match (kind, target) {
            (ClientKind::Sqlite, ConnectTarget::SqliteFile(path)) => {
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true);
                DatabasePool::Sqlite(sqlite_pool_options(settings).connect_lazy_with(options))
            }
            (ClientKind::Sqlite, ConnectTarget::SqliteUrl(url)) => {
                let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
                DatabasePool::Sqlite(sqlite_pool_options(settings).connect_lazy_with(options))
            }
            (ClientKind::Postgres, ConnectTarget::ServerUrl(url)) => {
                let options = PgConnectOptions::from_str(url)?;
                DatabasePool::Postgres(
                    PgPoolOptions::new()
                        .min_connections(settings.min_connections)
                        .max_connections(settings.max_connections)
                        .acquire_timeout(settings.acquire_timeout)
                        .connect_lazy_with(options),
                )
            }
            (ClientKind::MySql, ConnectTarget::ServerUrl(url)) => {
                let options = MySqlConnectOptions::from_str(url)?;
                DatabasePool::MySql(
                    MySqlPoolOptions::new()
                        .min_connections(settings.min_connections)
                        .max_connections(settings.max_connections)
                        .acquire_timeout(settings.acquire_timeout)
                        .connect_lazy_with(options),
                )
            }
            (kind, target) => {
                return Err(DatabaseError::InvalidConnection(format!(
                    "{:?} is not a valid target for the {} client",
                    target, kind
                )))
            }
        };

        Ok(pool)
    }

    pub fn kind(&self) -> ClientKind {
        match self {
            DatabasePool::Sqlite(_) => ClientKind::Sqlite,
            DatabasePool::Postgres(_) => ClientKind::Postgres,
            DatabasePool::MySql(_) => ClientKind::MySql,
        }
    }

    pub async fn close(&self) {
        match self {
            DatabasePool::Sqlite(pool) => pool.close().await,
            DatabasePool::Postgres(pool) => pool.close().await,
            DatabasePool::MySql(pool) => pool.close().await,
        }
    }
}

fn sqlite_pool_options(settings: &PoolSettings) -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .min_connections(settings.min_connections)
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
}
