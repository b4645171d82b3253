//! Environment settings
//!
//! Reads the variables the database configuration depends on. A `.env`
//! file (or `.env.test` when `APP_ENV=test`) is loaded first; variables
//! already present in the process environment take precedence.

use crate::{ConfigError, Result};
use std::path::Path;
use tracing::debug;

pub const DATABASE_CLIENT: &str = "DATABASE_CLIENT";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const APP_ENV: &str = "APP_ENV";

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Raw values read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSettings {
    pub database_client: String,
    pub database_url: String,
    pub log_level: String,
}

/// Dotenv file to load for a given `APP_ENV`
pub fn env_file_for(app_env: Option<&str>) -> &'static str {
    match app_env {
        Some("test") => ".env.test",
        _ => ".env",
    }
}

impl EnvSettings {
    /// Load the dotenv file from the working directory, then read the
    /// process environment
    pub fn load() -> Result<Self> {
        Self::load_from_dir(Path::new("."))
    }

    /// Load the dotenv file from `dir`, then read the process environment
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let app_env = std::env::var(APP_ENV).ok();
        let path = dir.join(env_file_for(app_env.as_deref()));

        // Don't fail if the file doesn't exist
        match dotenv::from_path(&path) {
            Ok(()) => debug!("Loaded environment from {}", path.display()),
            Err(e) => debug!("No {} loaded: {}", path.display(), e),
        }

        Self::from_env()
    }

    /// Read the process environment without touching dotenv files
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_client = required(&lookup, DATABASE_CLIENT)?;
        let database_url = required(&lookup, DATABASE_URL)?;
        let log_level = lookup(LOG_LEVEL)
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| "info".to_string());

        let settings = Self {
            database_client,
            database_url,
            log_level,
        };
        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "LOG_LEVEL must be one of: {}",
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::EnvVarMissing(key.to_string()))
}
