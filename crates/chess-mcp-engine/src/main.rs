//! Chess Engine MCP Server: binary resolution, subprocess supervision, and
//! a thin HTTP-facing Service Facade over a single UCI engine instance.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use engine_supervisor::{EngineInstance, EngineRegistry, ShutdownCoordinator};

use chess_mcp_engine::cli::Cli;
use chess_mcp_engine::config::Settings;
use chess_mcp_engine::facade::ServiceFacade;
use chess_mcp_engine::{http, logging};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("configuration validation failed: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    logging::init(settings.log_level, settings.log_format);
    tracing::info!(transport = ?cli.transport, "starting chess engine server");

    match run(settings).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "server exited with an error");
            std::process::ExitCode::FAILURE
        }
    }
}

/// Builds the engine, the facade, and the HTTP server, and runs until the
/// server future resolves. `registry.shutdown_all()` runs on every path out
/// of this function, including the error paths -- the normal-exit half of
/// the shutdown discipline that the signal handler doesn't cover.
async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = EngineRegistry::new();
    let _shutdown = ShutdownCoordinator::install(registry.clone());

    let engine = match EngineInstance::new(&settings.engine, &registry).await {
        Ok(instance) => {
            tracing::info!(path = %instance.binary_path().display(), "engine initialization successful");
            Some(instance)
        }
        Err(e) => {
            tracing::error!(error = %e, "engine initialization failed, tools will report errors");
            None
        }
    };

    let facade = Arc::new(ServiceFacade::new(engine));
    let app = http::router(http::AppState { facade });

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind server address {addr}"));

    let listener = match listener {
        Ok(listener) => listener,
        Err(e) => {
            registry.shutdown_all().await;
            return Err(e);
        }
    };
    tracing::info!(%addr, "server listening");

    let serve_result = axum::serve(listener, app)
        .await
        .context("server error while serving requests");

    registry.shutdown_all().await;
    serve_result
}
