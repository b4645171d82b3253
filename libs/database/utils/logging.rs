//! Logging initialization

use tracing_subscriber::EnvFilter;

/// Initialize tracing with a specific log level
///
/// `RUST_LOG`, when set, overrides the level. Logs go to stderr so
/// command output on stdout stays machine-readable.
pub fn init_tracing_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
