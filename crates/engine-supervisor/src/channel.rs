//! Line-oriented adapter around a child process's stdin/stdout.
//!
//! The UCI protocol has no framing beyond newlines. This module turns that
//! into `send`/`read_until` with deadlines, using `tokio::time::timeout`
//! around async reads instead of a manual poll loop: the read future
//! itself resolves (with EOF) the instant the child's stdout pipe closes,
//! so process death is detected without a separate liveness-polling tick.
//! A naive *blocking* read would not honor the deadline contract; an
//! *async* read wrapped in a timeout does, which is the Rust-native
//! equivalent of deadline-bounded polling.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, Command};

use crate::error::SupervisorError;

/// Owns one child process and the two halves of its line-oriented stdio.
pub struct LineChannel {
    child: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<tokio::process::ChildStdout>>,
}

impl LineChannel {
    /// Spawns `path` with piped stdin/stdout/stderr. Stderr is drained into
    /// `tracing::debug!` on a background task so a chatty engine can't
    /// block on a full stderr pipe; it is never read for protocol purposes.
    pub fn spawn(path: &Path) -> Result<Self, SupervisorError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(SupervisorError::SpawnFailed)?;

        let stdin = child.stdin.take().expect("piped stdin");
        let stdout = child.stdout.take().expect("piped stdout");
        let stderr = child.stderr.take().expect("piped stderr");

        tokio::spawn(async move {
            let mut stderr_lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = stderr_lines.next_line().await {
                tracing::debug!(engine_stderr = %line, "engine stderr");
            }
        });

        Ok(LineChannel {
            child,
            stdin,
            lines: BufReader::new(stdout).lines(),
        })
    }

    /// Writes `command` followed by a newline and flushes.
    pub async fn send(&mut self, command: &str) -> Result<(), SupervisorError> {
        if self.try_exit_status().is_some() {
            return Err(SupervisorError::ChannelClosed);
        }
        self.stdin
            .write_all(command.as_bytes())
            .await
            .map_err(|_| SupervisorError::ChannelClosed)?;
        self.stdin
            .write_all(b"\n")
            .await
            .map_err(|_| SupervisorError::ChannelClosed)?;
        self.stdin
            .flush()
            .await
            .map_err(|_| SupervisorError::ChannelClosed)?;
        Ok(())
    }

    /// Reads whole lines until one whose trimmed leading token starts with
    /// `prefix` is seen, returning every line read (inclusive of the match).
    /// Every line is retained, including `info` diagnostics, so a caller
    /// that ultimately times out still has the partial transcript.
    pub async fn read_until(
        &mut self,
        prefix: &str,
        deadline: Duration,
    ) -> Result<Vec<String>, SupervisorError> {
        let start = Instant::now();
        let mut lines = Vec::new();

        loop {
            let elapsed = start.elapsed();
            let remaining = match deadline.checked_sub(elapsed) {
                Some(d) if d > Duration::ZERO => d,
                _ => {
                    return Err(SupervisorError::Timeout {
                        prefix: prefix.to_string(),
                        elapsed_ms: elapsed.as_millis() as u64,
                    });
                }
            };

            let next = tokio::time::timeout(remaining, self.lines.next_line()).await;
            match next {
                Err(_elapsed) => {
                    return Err(SupervisorError::Timeout {
                        prefix: prefix.to_string(),
                        elapsed_ms: start.elapsed().as_millis() as u64,
                    });
                }
                Ok(Err(_io_err)) => return Err(SupervisorError::ChannelClosed),
                Ok(Ok(None)) => return Err(SupervisorError::ChannelClosed),
                Ok(Ok(Some(line))) => {
                    let matched = line.trim_start().starts_with(prefix);
                    lines.push(line);
                    if matched {
                        return Ok(lines);
                    }
                }
            }
        }
    }

    /// Non-blocking liveness check. `Some(status)` once the child has exited.
    pub fn try_exit_status(&mut self) -> Option<std::process::ExitStatus> {
        self.child.try_wait().ok().flatten()
    }

    /// Waits for the child to exit on its own, up to `timeout`.
    pub async fn wait_for_exit(&mut self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.child.wait())
            .await
            .is_ok()
    }

    /// Requests termination (SIGKILL via tokio's `start_kill` on all
    /// platforms it supports) and returns immediately.
    pub fn start_kill(&mut self) {
        let _ = self.child.start_kill();
    }
}
