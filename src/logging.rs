//! Diagnostic tracing for the engine and CLI.
//!
//! Library code only emits `tracing` events; installing a subscriber is left to
//! the binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`, defaulting to `warn`. Output goes to stderr in compact
/// format so stdout stays clean for puzzle output.
///
/// # Example
/// ```bash
/// RUST_LOG=liquid_sort=debug liquid_sort evaluate puzzle.txt
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
