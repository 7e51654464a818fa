//! Scripted fake UCI engine for facade-level end-to-end tests, in the same
//! spirit as `engine-supervisor`'s own test helpers but logging every
//! received line to a file so tests can assert on the exact UCI traffic.

use std::path::PathBuf;
use std::time::Duration;

use engine_supervisor::EngineConfig;

pub fn write_logging_engine(dir: &std::path::Path, log_path: &std::path::Path) -> PathBuf {
    use std::io::Write;
    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-stockfish");
    let script = format!(
        r#"#!/bin/sh
while IFS= read -r line; do
  echo "$line" >> {log}
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "bestmove e2e4 ponder e7e5" ;;
    quit) exit 0 ;;
  esac
done
"#,
        log = log_path.display()
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
