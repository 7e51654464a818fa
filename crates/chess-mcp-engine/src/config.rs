//! Environment-driven configuration for the chess MCP engine service.
//!
//! Every key is read from the process environment rather than a file,
//! matching the deployment model this service ships in (Docker Compose
//! injects environment, never a mounted config file). Validation happens
//! once at startup; an invalid value fails loading rather than silently
//! clamping, except for `log_level`, which falls back to a default with a
//! warning.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use engine_supervisor::EngineConfig;

/// Errors that can occur while loading settings from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be between {min} and {max}, got {value}")]
    OutOfRange {
        key: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{key} is set to '{value}', which is not a valid integer")]
    NotAnInteger { key: &'static str, value: String },
}

/// Logging verbosity, matching the conventional five-level scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARNING" | "WARN" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }

    /// A `tracing_subscriber::EnvFilter`-compatible directive string.
    pub fn as_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
            LogLevel::Critical => "error",
        }
    }
}

/// Output format for structured logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for local development.
    Text,
    /// One JSON object per line, for log aggregation in production.
    Json,
}

/// Full service configuration, combining supervisor inputs with the
/// transport-facing host/port/logging knobs.
#[derive(Debug, Clone)]
pub struct Settings {
    pub engine: EngineConfig,
    pub host: String,
    pub port: u16,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl Settings {
    /// Loads settings from the process environment. Recognized keys:
    /// `CHESSPAL_ENGINE_PATH`, `CHESSPAL_ENGINE_NAME`,
    /// `CHESSPAL_ENGINE_VERSION`, `CHESSPAL_ENGINE_OS`,
    /// `CHESSPAL_ENGINE_BINARY`, `CHESSPAL_ENGINE_DEPTH`,
    /// `CHESSPAL_ENGINE_TIMEOUT_MS`, `MCP_HOST`, `MCP_PORT`, `LOG_LEVEL`,
    /// `LOG_FORMAT`.
    pub fn load() -> Result<Self, ConfigError> {
        let engine_path = std::env::var("CHESSPAL_ENGINE_PATH").ok().map(PathBuf::from);
        let engine_name =
            std::env::var("CHESSPAL_ENGINE_NAME").unwrap_or_else(|_| "stockfish".to_string());
        let engine_version =
            std::env::var("CHESSPAL_ENGINE_VERSION").unwrap_or_else(|_| "17.1".to_string());
        let os_tag = std::env::var("CHESSPAL_ENGINE_OS").ok();
        let binary_name =
            std::env::var("CHESSPAL_ENGINE_BINARY").unwrap_or_else(|_| "stockfish".to_string());

        let search_depth = parse_ranged_env("CHESSPAL_ENGINE_DEPTH", 10, 1, 30)?;
        let timeout_ms = parse_ranged_env("CHESSPAL_ENGINE_TIMEOUT_MS", 1000, 100, 60_000)?;

        let host = std::env::var("MCP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_ranged_env("MCP_PORT", 9000, 1, 65535)? as u16;

        let log_level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| LogLevel::parse(&v))
            .unwrap_or_else(|| {
                if let Some(raw) = std::env::var("LOG_LEVEL").ok().filter(|v| !v.is_empty()) {
                    tracing::warn!(value = %raw, "invalid LOG_LEVEL, defaulting to INFO");
                }
                LogLevel::Info
            });

        let log_format = match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Settings {
            engine: EngineConfig {
                engine_path,
                engine_name,
                engine_version,
                os_tag,
                binary_name,
                movetime: Duration::from_millis(timeout_ms as u64),
                search_depth: search_depth as u32,
            },
            host,
            port,
            log_level,
            log_format,
        })
    }
}

fn parse_ranged_env(key: &'static str, default: i64, min: i64, max: i64) -> Result<i64, ConfigError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => {
            let value: i64 = raw
                .parse()
                .map_err(|_| ConfigError::NotAnInteger { key, value: raw })?;
            if value < min || value > max {
                return Err(ConfigError::OutOfRange { key, value, min, max });
            }
            Ok(value)
        }
    }
}
