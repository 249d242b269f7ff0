//! Tracing subscriber setup.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::MafiaError;

/// Maps a configured level name to a filter.
///
/// Accepts `trace`, `debug`, `info`, `warning` (or `warn`), and `error`,
/// in any case.
///
/// # Errors
/// Returns [`MafiaError::Config`] for any other name.
pub fn level_filter(name: &str) -> Result<LevelFilter, MafiaError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warning" | "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        other => Err(MafiaError::Config(format!("unknown log level '{other}'"))),
    }
}

/// Installs the global subscriber: an env filter plus the fmt layer.
///
/// `RUST_LOG`, when set, overrides `level`.
///
/// # Errors
/// Returns [`MafiaError::Config`] for an unknown level name or if a global
/// subscriber is already installed.
pub fn init(level: &str) -> Result<(), MafiaError> {
    let level = level_filter(level)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .parse_lossy("")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| MafiaError::Config(e.to_string()))
}
