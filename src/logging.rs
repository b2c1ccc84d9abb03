//! Subscriber setup for binaries and hosts.
//!
//! The library itself only emits `tracing` events. Filtering follows
//! `RUST_LOG` (default `info`); set `COGNITIVE_GAMES_LOG_JSON=1` for JSON
//! lines instead of the human-readable format.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment switch for JSON output.
pub const JSON_ENV: &str = "COGNITIVE_GAMES_LOG_JSON";

/// Install a global subscriber writing to stderr. Later calls are no-ops.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let use_json = std::env::var(JSON_ENV).map(|value| value == "1").unwrap_or(false);

    if use_json {
        let _ = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .json()
            .with_writer(std::io::stderr)
            .try_init();
    } else {
        let _ = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
