//! Deterministic engine binary discovery.
//!
//! Ordered policy, first match wins: an explicit configured path, then a
//! fixed list of conventional system locations, then a constructed
//! fallback path built from engine name/version/OS/binary. Every step that
//! fails falls through to the next one; only exhausting all three is an
//! error.

use std::path::{Path, PathBuf};

use crate::config::EngineConfig;
use crate::error::SupervisorError;

/// Where a resolved binary path came from. Carried only for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSource {
    /// Took the operator-configured `engine_path` as-is.
    Explicit,
    /// Found at one of the conventional system locations.
    SystemPath,
    /// Built from `{engine_name, engine_version, os_tag, binary_name}`.
    Fallback,
}

/// A resolved engine binary path plus how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathDescriptor {
    /// The resolved, executable path.
    pub path: PathBuf,
    /// Which policy step accepted it.
    pub source: PathSource,
}

/// Conventional system locations tried in order, relative to a binary name.
const SYSTEM_DIRS: &[&str] = &["/usr/games", "/usr/bin", "/usr/local/bin"];

/// Resolves an engine binary: explicit configured path, then conventional
/// system directories, then a versioned per-OS fallback layout.
pub fn resolve(config: &EngineConfig) -> Result<PathDescriptor, SupervisorError> {
    let mut tried = Vec::new();

    if let Some(explicit) = &config.engine_path {
        tried.push(explicit.display().to_string());
        if is_executable(explicit) {
            return Ok(PathDescriptor {
                path: explicit.clone(),
                source: PathSource::Explicit,
            });
        }
        tracing::warn!(
            path = %explicit.display(),
            "configured engine_path is not an existing executable, falling through"
        );
    }

    for dir in SYSTEM_DIRS {
        let candidate = Path::new(dir).join(&config.binary_name);
        tried.push(candidate.display().to_string());
        if is_executable(&candidate) {
            return Ok(PathDescriptor {
                path: candidate,
                source: PathSource::SystemPath,
            });
        }
    }

    let os_tag = match &config.os_tag {
        Some(tag) => tag.clone(),
        None => match EngineConfig::os_tag_for_host(std::env::consts::OS) {
            Some(tag) => tag.to_string(),
            None => {
                return Err(SupervisorError::BinaryNotFound {
                    tried: format!(
                        "{}; unsupported platform: {}",
                        tried.join(", "),
                        std::env::consts::OS
                    ),
                });
            }
        },
    };

    let fallback = PathBuf::from(format!(
        "engines/{}/{}/{}/{}",
        config.engine_name, config.engine_version, os_tag, config.binary_name
    ));
    tried.push(fallback.display().to_string());
    if is_executable(&fallback) {
        return Ok(PathDescriptor {
            path: fallback,
            source: PathSource::Fallback,
        });
    }

    Err(SupervisorError::BinaryNotFound {
        tried: tried.join(", "),
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
