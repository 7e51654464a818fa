//! Error taxonomy for the engine supervisor.

use thiserror::Error;

/// Errors surfaced by the Binary Resolver, Line Channel, and Engine Instance.
///
/// The Service Facade collapses all of these into a single opaque string
/// before they reach an RPC caller; the variants below are what the
/// supervisor itself reasons about and logs.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// No candidate engine binary satisfied existence-and-executability.
    #[error("no usable engine binary found (tried: {tried})")]
    BinaryNotFound {
        /// Human-readable list of every candidate path attempted.
        tried: String,
    },

    /// The OS-level process creation call failed.
    #[error("failed to spawn engine process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// The UCI handshake (`uci`/`uciok`, `isready`/`readyok`) did not complete.
    #[error("UCI handshake failed: {0}")]
    HandshakeFailed(String),

    /// An operation was attempted against an instance that is not `Ready`.
    #[error("engine instance is not ready")]
    NotReady,

    /// A read deadline elapsed before the expected response prefix arrived.
    #[error("timed out waiting for '{prefix}' after {elapsed_ms}ms")]
    Timeout {
        /// The UCI line prefix the caller was waiting for.
        prefix: String,
        /// How long the caller waited, in milliseconds.
        elapsed_ms: u64,
    },

    /// The child process exited (or its pipe closed) before the expected
    /// response arrived, or before a command could be written.
    #[error("engine process exited or its channel closed")]
    ChannelClosed,

    /// A line was received that did not match the shape the protocol expects,
    /// e.g. a `bestmove` response that never arrived, or `bestmove (none)`.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}

