//! Migrations descriptor and migration file discovery

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const MIGRATIONS_EXTENSION: &str = "ts";
pub const MIGRATIONS_DIRECTORY: &str = "./db/migrations";

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Migration directory not found: {0}")]
    DirectoryMissing(PathBuf),

    #[error("Failed to read migration directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Where migration files live and which extension they use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationsConfig {
    pub extension: String,
    pub directory: String,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            extension: MIGRATIONS_EXTENSION.to_string(),
            directory: MIGRATIONS_DIRECTORY.to_string(),
        }
    }
}

/// A migration file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// File name including extension; this is the ledger key
    pub name: String,
    pub path: PathBuf,
}

impl MigrationsConfig {
    /// Whether a file name is a migration under this descriptor
    pub fn matches(&self, file_name: &str) -> bool {
        if file_name.starts_with('.') {
            return false;
        }
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension)
    }

    /// List migration files, sorted by file name
    pub fn discover(&self) -> Result<Vec<MigrationFile>, MigrationError> {
        let dir = Path::new(&self.directory);
        if !dir.is_dir() {
            return Err(MigrationError::DirectoryMissing(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if self.matches(&name) {
                files.push(MigrationFile {
                    name,
                    path: entry.path(),
                });
            }
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            directory = %self.directory,
            count = files.len(),
            "Discovered migration files"
        );

        Ok(files)
    }
}
