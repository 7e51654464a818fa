//! The Engine Instance: owns one running child, drives the UCI handshake,
//! and exposes `best_move`/`is_ready`/`stop` behind a single serializing
//! lock.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Weak;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::channel::LineChannel;
use crate::config::EngineConfig;
use crate::error::SupervisorError;
use crate::registry::EngineRegistry;
use crate::resolver;

/// Minimum extra margin added to the configured movetime when computing
/// the deadline for the `bestmove` response.
const HANDSHAKE_MARGIN: Duration = Duration::from_secs(2);
/// Floor for the `bestmove` read deadline regardless of configured movetime.
const MIN_BESTMOVE_TIMEOUT: Duration = Duration::from_secs(5);
/// Deadline for each handshake exchange (`uciok`, `readyok`).
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
/// Grace period after `quit` before escalating to termination.
const QUIT_GRACE: Duration = Duration::from_secs(5);
/// Grace period after requesting termination before a force-kill.
const TERMINATE_GRACE: Duration = Duration::from_secs(1);

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Classifies which `best_move` failures mean the child can no longer be
/// trusted and must be considered `Stopped`. A "no best move" timeout is
/// surfaced as [`SupervisorError::ProtocolViolation`] (bestmove absent is
/// the canonical example of that variant) but still reflects a dead or
/// hung process, so it is fatal like [`SupervisorError::Timeout`] and
/// [`SupervisorError::ChannelClosed`]. A `bestmove (none)` response or a
/// malformed-but-present bestmove line means the engine is still healthy
/// and answered correctly; those are not fatal.
fn is_fatal_to_instance(error: &SupervisorError) -> bool {
    match error {
        SupervisorError::Timeout { .. } | SupervisorError::ChannelClosed => true,
        SupervisorError::ProtocolViolation(msg) => msg.contains("No best move found"),
        _ => false,
    }
}

/// Lifecycle state of an [`EngineInstance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Starting,
    Ready,
    Busy,
    Stopping,
    Stopped,
}

struct InstanceInner {
    channel: Option<LineChannel>,
    state: EngineState,
}

/// Owns one supervised UCI engine subprocess.
pub struct EngineInstance {
    id: u64,
    binary_path: PathBuf,
    movetime: Duration,
    registry: Weak<EngineRegistry>,
    inner: Mutex<InstanceInner>,
}

impl EngineInstance {
    /// Resolves the binary, spawns it, drives the UCI handshake, and
    /// registers the resulting instance with `registry`. Fails with
    /// [`SupervisorError::BinaryNotFound`], [`SupervisorError::SpawnFailed`],
    /// or [`SupervisorError::HandshakeFailed`].
    pub async fn new(
        config: &EngineConfig,
        registry: &std::sync::Arc<EngineRegistry>,
    ) -> Result<std::sync::Arc<Self>, SupervisorError> {
        let descriptor = resolver::resolve(config)?;
        tracing::info!(path = %descriptor.path.display(), source = ?descriptor.source, "resolved engine binary");

        let mut channel = LineChannel::spawn(&descriptor.path)?;

        if let Err(e) = Self::handshake(&mut channel).await {
            channel.start_kill();
            let _ = channel.wait_for_exit(Duration::from_secs(1)).await;
            return Err(e);
        }

        let instance = std::sync::Arc::new(EngineInstance {
            id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed),
            binary_path: descriptor.path,
            movetime: config.movetime,
            registry: std::sync::Arc::downgrade(registry),
            inner: Mutex::new(InstanceInner {
                channel: Some(channel),
                state: EngineState::Ready,
            }),
        });

        registry.register(&instance);
        tracing::info!(instance_id = instance.id, "engine instance ready");
        Ok(instance)
    }

    async fn handshake(channel: &mut LineChannel) -> Result<(), SupervisorError> {
        channel
            .send("uci")
            .await
            .map_err(|_| SupervisorError::HandshakeFailed("failed to send uci".into()))?;
        channel
            .read_until("uciok", HANDSHAKE_TIMEOUT)
            .await
            .map_err(|e| SupervisorError::HandshakeFailed(format!("no uciok: {e}")))?;

        channel
            .send("setoption name Hash value 128")
            .await
            .map_err(|_| SupervisorError::HandshakeFailed("failed to set Hash option".into()))?;
        channel
            .send("setoption name Threads value 4")
            .await
            .map_err(|_| SupervisorError::HandshakeFailed("failed to set Threads option".into()))?;

        channel
            .send("isready")
            .await
            .map_err(|_| SupervisorError::HandshakeFailed("failed to send isready".into()))?;
        channel
            .read_until("readyok", HANDSHAKE_TIMEOUT)
            .await
            .map_err(|e| SupervisorError::HandshakeFailed(format!("no readyok: {e}")))?;

        Ok(())
    }

    /// Diagnostic path of the resolved binary.
    pub fn binary_path(&self) -> &std::path::Path {
        &self.binary_path
    }

    /// Internal registry identity. Not part of the public contract.
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Requests the best move for `fen`, optionally after `move_history`.
    pub async fn best_move(
        &self,
        fen: &str,
        move_history: &[String],
    ) -> Result<String, SupervisorError> {
        let mut guard = self.inner.lock().await;

        if guard.state != EngineState::Ready {
            return Err(SupervisorError::NotReady);
        }
        if let Some(channel) = guard.channel.as_mut() {
            if channel.try_exit_status().is_some() {
                guard.state = EngineState::Stopped;
                guard.channel = None;
                return Err(SupervisorError::NotReady);
            }
        }
        guard.state = EngineState::Busy;

        let result = self.run_search(&mut guard, fen, move_history).await;

        match &result {
            Ok(_) => guard.state = EngineState::Ready,
            Err(e) if is_fatal_to_instance(e) => {
                guard.state = EngineState::Stopped;
                if let Some(mut channel) = guard.channel.take() {
                    channel.start_kill();
                }
            }
            // A "(none)" response, or a malformed bestmove line, means the
            // engine answered the protocol correctly -- the instance
            // stays Ready for the next caller.
            Err(_) => guard.state = EngineState::Ready,
        }

        result
    }

    async fn run_search(
        &self,
        guard: &mut InstanceInner,
        fen: &str,
        move_history: &[String],
    ) -> Result<String, SupervisorError> {
        let channel = guard.channel.as_mut().ok_or(SupervisorError::ChannelClosed)?;

        let mut position_cmd = format!("position fen {fen}");
        if !move_history.is_empty() {
            position_cmd.push_str(" moves ");
            position_cmd.push_str(&move_history.join(" "));
        }
        channel.send(&position_cmd).await?;

        channel
            .send(&format!("go movetime {}", self.movetime.as_millis()))
            .await?;

        let deadline = std::cmp::max(self.movetime + HANDSHAKE_MARGIN, MIN_BESTMOVE_TIMEOUT);
        let lines = match channel.read_until("bestmove", deadline).await {
            Ok(lines) => lines,
            Err(SupervisorError::Timeout { elapsed_ms, .. }) => {
                return Err(SupervisorError::ProtocolViolation(format!(
                    "No best move found in engine response (waited {elapsed_ms}ms)"
                )));
            }
            Err(e) => return Err(e),
        };

        let bestmove_line = lines
            .last()
            .expect("read_until always returns at least one line on success");
        let mut tokens = bestmove_line.split_whitespace();
        let _ = tokens.next(); // "bestmove"
        let mv = tokens.next().ok_or_else(|| {
            SupervisorError::ProtocolViolation(format!(
                "malformed bestmove line: '{bestmove_line}'"
            ))
        })?;

        if mv == "(none)" {
            return Err(SupervisorError::ProtocolViolation(
                "engine reported no legal move (bestmove (none))".to_string(),
            ));
        }

        Ok(mv.to_string())
    }

    /// Returns whether the instance has completed its handshake and is not
    /// otherwise busy, stopping, or stopped. Never fails.
    pub async fn is_ready(&self) -> bool {
        let mut guard = self.inner.lock().await;
        if let Some(channel) = guard.channel.as_mut() {
            if channel.try_exit_status().is_some() {
                guard.state = EngineState::Stopped;
                guard.channel = None;
            }
        }
        guard.state == EngineState::Ready
    }

    /// Shuts the instance down: `quit`, grace period, terminate, grace
    /// period, force-kill. Idempotent; never raises. Unregisters itself
    /// from the registry it was created with.
    pub async fn stop(&self) {
        {
            let mut guard = self.inner.lock().await;
            if guard.state == EngineState::Stopped {
                return;
            }
            guard.state = EngineState::Stopping;

            if let Some(mut channel) = guard.channel.take() {
                if channel.try_exit_status().is_none() {
                    if let Err(e) = channel.send("quit").await {
                        tracing::debug!(instance_id = self.id, error = %e, "failed to send quit");
                    }
                    if !channel.wait_for_exit(QUIT_GRACE).await {
                        tracing::warn!(instance_id = self.id, "engine did not exit after quit, terminating");
                        channel.start_kill();
                        if !channel.wait_for_exit(TERMINATE_GRACE).await {
                            tracing::warn!(instance_id = self.id, "engine still alive, force-killing");
                            channel.start_kill();
                            let _ = channel.wait_for_exit(Duration::from_millis(500)).await;
                        }
                    }
                }
            }

            guard.state = EngineState::Stopped;
        }

        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(self.id);
        }
        tracing::info!(instance_id = self.id, "engine instance stopped");
    }
}
