//! Migration ledger inspection
//!
//! Reads the tables migration tooling keeps (`knex_migrations` and
//! `knex_migrations_lock`) and compares them with the files on disk.
//! Nothing here writes to the database.

use crate::pool::DatabasePool;
use crate::Result;
use db_config::MigrationFile;
use std::collections::HashSet;

pub const MIGRATIONS_TABLE: &str = "knex_migrations";
pub const MIGRATIONS_LOCK_TABLE: &str = "knex_migrations_lock";

/// A ledger row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedMigration {
    pub name: String,
    pub batch: i64,
}

/// Ledger compared against the migration directory
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MigrationStatus {
    pub completed: Vec<CompletedMigration>,
    /// Files on disk not yet recorded, in run order
    pub pending: Vec<String>,
    /// Recorded migrations whose file is gone
    pub missing: Vec<String>,
}

impl MigrationStatus {
    pub fn compare(completed: Vec<CompletedMigration>, files: &[MigrationFile]) -> Self {
        let done: HashSet<&str> = completed.iter().map(|m| m.name.as_str()).collect();
        let on_disk: HashSet<&str> = files.iter().map(|f| f.name.as_str()).collect();

        let pending = files
            .iter()
            .filter(|f| !done.contains(f.name.as_str()))
            .map(|f| f.name.clone())
            .collect();
        let missing = completed
            .iter()
            .filter(|m| !on_disk.contains(m.name.as_str()))
            .map(|m| m.name.clone())
            .collect();

        Self {
            completed,
            pending,
            missing,
        }
    }

    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_corrupt(&self) -> bool {
        !self.missing.is_empty()
    }

    /// Highest version prefix among completed migrations, or `none`
    ///
    /// Prefixes compare as strings, so out-of-order runs still report
    /// the newest migration.
    pub fn current_version(&self) -> String {
        self.completed
            .iter()
            .map(|m| version_prefix(&m.name))
            .max()
            .map(str::to_string)
            .unwrap_or_else(|| "none".to_string())
    }
}

fn version_prefix(name: &str) -> &str {
    name.split('_').next().unwrap_or(name)
}

pub(crate) async fn table_exists(pool: &DatabasePool, table: &str) -> Result<bool> {
    let count: i64 = match pool {
        DatabasePool::Sqlite(pool) => {
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(pool)
            .await?
        }
        DatabasePool::Postgres(pool) => {
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = current_schema() AND table_name = $1",
            )
            .bind(table)
            .fetch_one(pool)
            .await?
        }
        DatabasePool::MySql(pool) => {
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = DATABASE() AND table_name = ?",
            )
            .bind(table)
            .fetch_one(pool)
            .await?
        }
    };

    Ok(count > 0)
}

pub(crate) async fn completed_migrations(pool: &DatabasePool) -> Result<Vec<CompletedMigration>> {
    if !table_exists(pool, MIGRATIONS_TABLE).await? {
        return Ok(Vec::new());
    }

    let query = format!("SELECT name, batch FROM {} ORDER BY id", MIGRATIONS_TABLE);
    let rows = match pool {
        DatabasePool::Sqlite(pool) => sqlx::query_as::<_, (String, i64)>(&query)
            .fetch_all(pool)
            .await?,
        DatabasePool::Postgres(pool) => sqlx::query_as::<_, (String, i32)>(&query)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|(name, batch)| (name, i64::from(batch)))
            .collect(),
        DatabasePool::MySql(pool) => sqlx::query_as::<_, (String, i32)>(&query)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|(name, batch)| (name, i64::from(batch)))
            .collect(),
    };

    Ok(rows
        .into_iter()
        .map(|(name, batch)| CompletedMigration { name, batch })
        .collect())
}

pub(crate) async fn is_locked(pool: &DatabasePool) -> Result<bool> {
    if !table_exists(pool, MIGRATIONS_LOCK_TABLE).await? {
        return Ok(false);
    }

    let query = format!(
        "SELECT COUNT(*) FROM {} WHERE is_locked = 1",
        MIGRATIONS_LOCK_TABLE
    );
    let count: i64 = match pool {
        DatabasePool::Sqlite(pool) => sqlx::query_scalar(&query).fetch_one(pool).await?,
        DatabasePool::Postgres(pool) => sqlx::query_scalar(&query).fetch_one(pool).await?,
        DatabasePool::MySql(pool) => sqlx::query_scalar(&query).fetch_one(pool).await?,
    };

    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str) -> MigrationFile {
        MigrationFile {
            name: name.to_string(),
            path: PathBuf::from("./db/migrations").join(name),
        }
    }

    fn done(name: &str, batch: i64) -> CompletedMigration {
        CompletedMigration {
            name: name.to_string(),
            batch,
        }
    }

    #[test]
    fn test_compare_pending_and_missing() {
        let status = MigrationStatus::compare(
            vec![
                done("20240101000000_create_users.ts", 1),
                done("20231201000000_removed.ts", 1),
            ],
            &[
                file("20240101000000_create_users.ts"),
                file("20240201000000_add_sessions.ts"),
                file("20240301000000_add_notes.ts"),
            ],
        );

        assert_eq!(
            status.pending,
            vec!["20240201000000_add_sessions.ts", "20240301000000_add_notes.ts"]
        );
        assert_eq!(status.missing, vec!["20231201000000_removed.ts"]);
        assert!(!status.is_up_to_date());
        assert!(status.is_corrupt());
    }

    #[test]
    fn test_up_to_date() {
        let status = MigrationStatus::compare(
            vec![done("20240101000000_create_users.ts", 1)],
            &[file("20240101000000_create_users.ts")],
        );

        assert!(status.is_up_to_date());
        assert!(!status.is_corrupt());
        assert_eq!(status.current_version(), "20240101000000");
    }

    #[test]
    fn test_current_version_without_migrations() {
        let status = MigrationStatus::compare(Vec::new(), &[file("20240101000000_init.ts")]);
        assert_eq!(status.current_version(), "none");
    }

    #[test]
    fn test_current_version_ignores_run_order() {
        let status = MigrationStatus::compare(
            vec![
                done("20240301000000_add_notes.ts", 1),
                done("20240101000000_create_users.ts", 2),
            ],
            &[],
        );
        assert_eq!(status.current_version(), "20240301000000");
    }

    #[test]
    fn test_current_version_uses_highest_prefix() {
        let status = MigrationStatus::compare(
            vec![done("001_init.ts", 1), done("002_users.ts", 2)],
            &[],
        );
        assert_eq!(status.current_version(), "002");
    }
}
