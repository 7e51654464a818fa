//! Inputs the supervisor needs to locate and drive an engine binary.
//!
//! This is deliberately narrower than the service's full configuration
//! (host/port/log level live one layer up, in the facade binary); it is
//! just the knobs binary resolution and the UCI search loop need.

use std::path::PathBuf;
use std::time::Duration;

/// Where to look for the engine binary, and how long to let it think.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Explicit configured path (`engine_path`). Overrides discovery when
    /// it points at an existing, executable file.
    pub engine_path: Option<PathBuf>,
    /// Name of the engine, used only to build the fallback path.
    pub engine_name: String,
    /// Version of the engine, used only to build the fallback path.
    pub engine_version: String,
    /// OS tag override (`engine_os`/`os_tag`). When absent, derived from
    /// the host OS via [`os_tag_for_host`].
    pub os_tag: Option<String>,
    /// Name of the binary file itself, e.g. `"stockfish"`.
    pub binary_name: String,
    /// Fixed per-move thinking budget passed to `go movetime`.
    pub movetime: Duration,
    /// Search depth the operator configured. Validated at load time but not
    /// threaded into the `go` command: the protocol uses a fixed `movetime`
    /// budget rather than a depth limit.
    pub search_depth: u32,
}

impl EngineConfig {
    /// Derives the conventional OS tag for the given `std::env::consts::OS`
    /// value.
    pub fn os_tag_for_host(os: &str) -> Option<&'static str> {
        match os {
            "macos" => Some("macos"),
            "linux" => Some("linux"),
            "windows" => Some("windows"),
            _ => None,
        }
    }
}
