//! Process-level check that a `SIGTERM` reaches `ShutdownCoordinator` and
//! the binary exits cleanly, rather than being killed by the default
//! disposition or hanging.

use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn wait_until_listening(port: u16, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if TcpStream::connect(("127.0.0.1", port)).is_ok() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}

fn wait_for_exit(child: &mut Child, timeout: Duration) -> Option<ExitStatus> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Ok(Some(status)) = child.try_wait() {
            return Some(status);
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    None
}

#[test]
#[cfg(unix)]
fn sigterm_runs_shutdown_all_and_exits_zero() {
    let port = free_port();

    let mut child = Command::new(env!("CARGO_BIN_EXE_chess-mcp-engine"))
        .env("MCP_HOST", "127.0.0.1")
        .env("MCP_PORT", port.to_string())
        .env("CHESSPAL_ENGINE_PATH", "/definitely/not/a/real/engine")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn the chess-mcp-engine binary");

    assert!(
        wait_until_listening(port, Duration::from_secs(5)),
        "server never started listening on {port}"
    );

    let kill_status = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .expect("failed to invoke kill(1)");
    assert!(kill_status.success(), "kill(1) itself failed to run");

    let exit_status = wait_for_exit(&mut child, Duration::from_secs(5));
    match exit_status {
        Some(status) => assert_eq!(status.code(), Some(0)),
        None => {
            let _ = child.kill();
            panic!("process did not exit within 5s of receiving SIGTERM");
        }
    }
}
