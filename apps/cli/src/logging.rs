//! Logging setup for the `w3rt` binary.
//!
//! Library crates only emit `tracing` events; this binary is the only
//! place a subscriber is installed — `RUST_LOG`-driven `EnvFilter` with
//! compact formatting.

use tracing_subscriber::EnvFilter;

pub fn init(level_override: Option<&str>) {
    let filter = level_override.map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        EnvFilter::new,
    );
    tracing_subscriber::fmt().with_env_filter(filter).compact().with_target(false).init();
}
