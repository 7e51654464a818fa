//! Shared helpers for building a scripted fake UCI engine as a real
//! subprocess, standing in for Stockfish the way
//! `original_source/tests/conftest.py`'s `MockProcess` stands in for it in
//! the Python test suite -- except here it is an actual executable rather
//! than a mocked `subprocess.Popen`, since the supervisor drives a real
//! `tokio::process::Child`.

use std::path::PathBuf;
use std::time::Duration;

use engine_supervisor::EngineConfig;

/// Writes a shell script to `dir` that behaves like a trivial UCI engine,
/// and returns its path. `body` is inlined into a `while read -r line; do
/// case "$line" in ... esac; done` loop reading from stdin.
pub fn write_fake_engine(dir: &std::path::Path, name: &str, body: &str) -> PathBuf {
    use std::io::Write;
    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let script = format!(
        "#!/bin/sh\nwhile IFS= read -r line; do\n{body}\ndone\n"
    );
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(script.as_bytes()).unwrap();

    #[cfg(unix)]
    {
        let mut perms = file.metadata().unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
    }

    path
}

/// A well-behaved fake Stockfish: answers `uci`/`isready` handshakes and
/// always replies `bestmove e2e4`.
pub fn well_behaved_engine(dir: &std::path::Path) -> PathBuf {
    write_fake_engine(
        dir,
        "fake-stockfish",
        r#"
  case "$line" in
    uci) echo "id name FakeFish"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "info depth 1 score cp 10"; echo "bestmove e2e4 ponder e7e5" ;;
    quit) exit 0 ;;
  esac
"#,
    )
}

/// A fake engine that never sends `uciok`, to exercise handshake failure.
pub fn silent_on_uci_engine(dir: &std::path::Path) -> PathBuf {
    write_fake_engine(
        dir,
        "fake-silent",
        r#"
  case "$line" in
    isready) echo "readyok" ;;
    quit) exit 0 ;;
  esac
"#,
    )
}

/// A fake engine that completes the handshake but only ever emits `info`
/// lines for `go`, never a `bestmove`.
pub fn never_bestmove_engine(dir: &std::path::Path) -> PathBuf {
    write_fake_engine(
        dir,
        "fake-no-bestmove",
        r#"
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "info depth 1 score cp 10"; echo "info depth 2 score cp 12" ;;
    quit) exit 0 ;;
  esac
"#,
    )
}

/// A fake engine reporting no legal move via `bestmove (none)`.
pub fn no_legal_move_engine(dir: &std::path::Path) -> PathBuf {
    write_fake_engine(
        dir,
        "fake-none",
        r#"
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "bestmove (none)" ;;
    quit) exit 0 ;;
  esac
"#,
    )
}

pub fn config_for(path: PathBuf) -> EngineConfig {
    EngineConfig {
        engine_path: Some(path),
        engine_name: "stockfish".to_string(),
        engine_version: "17.1".to_string(),
        os_tag: Some("linux".to_string()),
        binary_name: "stockfish".to_string(),
        movetime: Duration::from_millis(50),
        search_depth: 10,
    }
}
