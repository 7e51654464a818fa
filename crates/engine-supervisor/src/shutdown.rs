//! Installs signal- and exit-driven shutdown hooks for a registry.
//!
//! Two things are needed: a handler for the conventional interrupt/terminate
//! signals that reaps every live engine and then exits zero, and a
//! normal-exit hook that does the same reaping. The signal half is handled
//! here with a background task racing `ctrl_c` against `SIGTERM`. The
//! normal-exit half is the caller's responsibility (call
//! `registry.shutdown_all().await` on every return path out of `main`,
//! including error paths) since Rust has no asynchronous `atexit`
//! equivalent; [`ShutdownCoordinator::install`] documents this contract.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::registry::EngineRegistry;

/// Owns the background task that listens for interrupt/terminate signals.
pub struct ShutdownCoordinator {
    _signal_task: tokio::task::JoinHandle<()>,
}

impl ShutdownCoordinator {
    /// Installs the signal handler exactly once. The handler is idempotent
    /// against repeated signal delivery: only the first signal received
    /// triggers `shutdown_all` and process exit.
    ///
    /// Callers must *also* run `registry.shutdown_all().await` on the
    /// normal-exit path of `main` (e.g. after the server future resolves,
    /// and in any early-return error branch) -- that is the "normal exit
    /// hook" half this function does not cover.
    pub fn install(registry: Arc<EngineRegistry>) -> Self {
        let fired = Arc::new(AtomicBool::new(false));

        let task = tokio::spawn(async move {
            wait_for_termination_signal().await;

            if fired.swap(true, Ordering::SeqCst) {
                return;
            }

            tracing::info!("termination signal received, shutting down gracefully");
            registry.shutdown_all().await;
            tracing::info!("graceful shutdown complete");
            std::process::exit(0);
        });

        ShutdownCoordinator {
            _signal_task: task,
        }
    }
}

#[cfg(unix)]
async fn wait_for_termination_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate =
        signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_termination_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
