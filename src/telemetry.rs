//! Tracing subscriber setup for the server binary.

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;

/// Installs the global fmt subscriber capped at `level`.
///
/// Calling this more than once keeps the first subscriber; later calls are
/// ignored so tests and embedders can initialise freely.
pub fn init_tracing(level: Level) {
    let installed = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from_level(level))
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
