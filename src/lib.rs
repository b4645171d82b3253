//! dbstrap - database bootstrap
//!
//! Reads database settings from the environment and builds a pooled
//! client handle from them.
//!
//! ## Architecture
//!
//! - **db_config**: configuration record built from environment variables
//! - **database**: client handle, pool and migration ledger inspection
//! - **bin_common**: command parsing for the `dbstrap` binary
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dbstrap::database::Database;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let db = Database::connect_from_env().await?;
//! db.ping().await?;
//! # Ok(())
//! # }
//! ```

// Re-export workspace libraries for convenience
pub use database;
pub use db_config;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;

    pub use cli::{parse_args, usage, Command, UnknownCommand};
}
