//! Common utilities for database binaries

mod logging;

pub use logging::init_tracing_with_level;
