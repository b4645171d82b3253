//! CLI utilities for binaries
//!
//! Handles command selection and argument parsing
//! for the `dbstrap` binary.

use std::fmt;

/// Command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the resolved configuration as JSON
    Config,
    /// Connect and ping the database
    Check,
    /// List completed and pending migrations
    MigrateList,
    /// Exit non-zero when migrations are pending
    MigrateStatus,
    /// Print the version of the last completed migration
    MigrateCurrentVersion,
}

impl Command {
    /// Command name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::Config => "config",
            Command::Check => "check",
            Command::MigrateList => "migrate:list",
            Command::MigrateStatus => "migrate:status",
            Command::MigrateCurrentVersion => "migrate:current-version",
        }
    }

    /// Whether the command needs a database connection
    pub fn needs_connection(&self) -> bool {
        !matches!(self, Command::Config)
    }

    pub fn all() -> [Command; 5] {
        [
            Command::Config,
            Command::Check,
            Command::MigrateList,
            Command::MigrateStatus,
            Command::MigrateCurrentVersion,
        ]
    }

    /// Pick the command from arguments (program name excluded)
    ///
    /// No arguments means [`Command::Config`].
    pub fn from_args(args: &[String]) -> Result<Self, UnknownCommand> {
        let Some(first) = args.first() else {
            return Ok(Command::Config);
        };

        Command::all()
            .into_iter()
            .find(|command| command.name() == first.as_str())
            .ok_or_else(|| UnknownCommand(first.clone()))
    }
}

/// Argument that names no known command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command '{}'\n\n{}", self.0, usage())
    }
}

impl std::error::Error for UnknownCommand {}

/// Usage text listing every command
pub fn usage() -> String {
    let names: Vec<&str> = Command::all().iter().map(|c| c.name()).collect();
    format!("usage: dbstrap [{}]", names.join(" | "))
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}
