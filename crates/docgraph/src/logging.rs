//! Subscriber setup for binaries and tests embedding the pipeline.
//!
//! Library crates log through the `log` facade and `tracing` spans; the
//! subscriber installed here receives both.

use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, or `default_filter` when unset or invalid
fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install a human-readable subscriber writing to stderr.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

/// Install a JSON subscriber writing to stderr, for log collectors.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_json(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(default_filter))
        .with_writer(std::io::stderr)
        .with_current_span(true)
        .try_init()
        .is_ok()
}
