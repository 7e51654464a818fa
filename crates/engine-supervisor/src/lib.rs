//! Engine Subprocess Supervisor.
//!
//! Locates a native UCI engine binary, spawns and initializes it,
//! multiplexes line-oriented UCI request/response exchanges over its
//! standard streams with strict ordering and timeouts, and enforces a
//! global shutdown discipline across all engine instances.
//!
//! This crate deliberately knows nothing about chess rules, FEN parsing,
//! or the transport that calls into it -- it exposes `best_move`/`is_ready`/
//! `stop` as plain UCI-level operations for a caller (the Service Facade,
//! one layer up) to compose.

mod channel;
mod config;
mod error;
mod instance;
mod registry;
mod resolver;
mod shutdown;

pub use config::EngineConfig;
pub use error::SupervisorError;
pub use instance::{EngineInstance, EngineState};
pub use registry::EngineRegistry;
pub use resolver::{resolve, PathDescriptor, PathSource};
pub use shutdown::ShutdownCoordinator;
