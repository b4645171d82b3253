use anyhow::Result;
use dbstrap::bin_common::{parse_args, Command};
use dbstrap::database::{init_tracing_with_level, Database, MigrationStatus};
use dbstrap::db_config::{DatabaseConfig, EnvSettings};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let command = match Command::from_args(&parse_args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    // Load settings first (before logging is initialized)
    let settings = EnvSettings::load()?;
    init_tracing_with_level(&settings.log_level);

    let config = DatabaseConfig::from_settings(&settings);
    config.log();

    if !command.needs_connection() {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let db = Database::connect(config).await?;
    let exit_code = run(&db, &command).await;
    db.close().await;

    match exit_code {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => Err(e),
    }
}

async fn run(db: &Database, command: &Command) -> Result<i32> {
    match command {
        Command::Config => Ok(0),
        Command::Check => {
            db.ping().await?;
            info!("Connected to {} database", db.kind());
            Ok(0)
        }
        Command::MigrateList => {
            let status = db.migration_status().await?;
            print_status(&status);
            if db.is_locked().await? {
                warn!("Migration lock is currently held");
            }
            Ok(0)
        }
        Command::MigrateStatus => {
            let status = db.migration_status().await?;
            if status.is_corrupt() {
                error!(
                    "Migration directory is corrupt, missing files: {}",
                    status.missing.join(", ")
                );
                return Ok(1);
            }
            if status.is_up_to_date() {
                info!("All migrations have been run");
                Ok(0)
            } else {
                info!("{} pending migration(s)", status.pending.len());
                Ok(1)
            }
        }
        Command::MigrateCurrentVersion => {
            let status = db.migration_status().await?;
            println!("{}", status.current_version());
            Ok(0)
        }
    }
}

fn print_status(status: &MigrationStatus) {
    if status.completed.is_empty() {
        println!("No completed migrations");
    } else {
        println!("Found {} completed migration file(s):", status.completed.len());
        for migration in &status.completed {
            println!("  {} (batch {})", migration.name, migration.batch);
        }
    }

    if status.pending.is_empty() {
        println!("No pending migrations");
    } else {
        println!("Found {} pending migration file(s):", status.pending.len());
        for name in &status.pending {
            println!("  {}", name);
        }
    }

    for name in &status.missing {
        println!("  missing on disk: {}", name);
    }
}
