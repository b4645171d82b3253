//! Client selector resolution and pool sizing

use crate::DatabaseError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Database driver picked by `DATABASE_CLIENT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKind {
    Sqlite,
    Postgres,
    MySql,
}

impl FromStr for ClientKind {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "sqlite3" | "better-sqlite3" => Ok(ClientKind::Sqlite),
            "pg" | "postgres" | "postgresql" | "pgnative" => Ok(ClientKind::Postgres),
            "mysql" | "mysql2" => Ok(ClientKind::MySql),
            _ => Err(DatabaseError::UnsupportedClient(s.to_string())),
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClientKind::Sqlite => "sqlite",
            ClientKind::Postgres => "postgres",
            ClientKind::MySql => "mysql",
        };
        f.write_str(name)
    }
}

impl ClientKind {
    /// Default pool sizing for this driver
    pub fn pool_settings(&self) -> PoolSettings {
        match self {
            // SQLite allows a single writer
            ClientKind::Sqlite => PoolSettings {
                min_connections: 1,
                max_connections: 1,
                ..PoolSettings::default()
            },
            ClientKind::Postgres | ClientKind::MySql => PoolSettings::default(),
        }
    }
}

/// Connection pool sizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_connections: 2,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_aliases() {
        for name in ["sqlite", "sqlite3", "better-sqlite3", "SQLite3"] {
            assert_eq!(name.parse::<ClientKind>().unwrap(), ClientKind::Sqlite);
        }
        for name in ["pg", "postgres", "postgresql", "pgnative", " PG "] {
            assert_eq!(name.parse::<ClientKind>().unwrap(), ClientKind::Postgres);
        }
        for name in ["mysql", "mysql2"] {
            assert_eq!(name.parse::<ClientKind>().unwrap(), ClientKind::MySql);
        }
    }

    #[test]
    fn test_unknown_client() {
        let err = "oracledb".parse::<ClientKind>().unwrap_err();
        assert!(matches!(err, DatabaseError::UnsupportedClient(ref name) if name == "oracledb"));
        assert!("".parse::<ClientKind>().is_err());
    }

    #[test]
    fn test_pool_settings() {
        let sqlite = ClientKind::Sqlite.pool_settings();
        assert_eq!(sqlite.min_connections, 1);
        assert_eq!(sqlite.max_connections, 1);

        let pg = ClientKind::Postgres.pool_settings();
        assert_eq!(pg.min_connections, 2);
        assert_eq!(pg.max_connections, 10);
        assert_eq!(pg.acquire_timeout, Duration::from_secs(60));
    }
}
