//! Tracing subscriber setup
//!
//! stdout carries the MCP protocol, so every log line goes to stderr
//! without ANSI colors.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` wins when set, otherwise `default_level` (the configured
/// `LOG_LEVEL`) is used. Returns `false` if a subscriber was already
/// installed, which happens when tests build several servers.
pub fn init_tracing(default_level: &str) -> bool {
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok()
}
