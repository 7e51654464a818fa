//! Structured logging setup.

use crate::config::{LogFormat, LogLevel};

/// Initializes the global `tracing` subscriber. Must be called exactly
/// once, as early in `main` as possible, before any other module logs.
pub fn init(level: LogLevel, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_filter_directive()));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}
