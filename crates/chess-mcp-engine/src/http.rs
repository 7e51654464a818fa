//! Minimal HTTP surface over the Service Facade: one JSON POST endpoint per
//! facade operation, plus `/health` and `/ready` for orchestrators. This is
//! not a full MCP JSON-RPC/SSE transport -- only the facade's interface is
//! specified, and this is enough surface to drive it end-to-end.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::facade::ServiceFacade;

#[derive(Clone)]
pub struct AppState {
    pub facade: Arc<ServiceFacade>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/tools/get_best_move", post(get_best_move))
        .route("/tools/validate_move", post(validate_move))
        .route("/tools/legal_moves", post(legal_moves))
        .route("/tools/game_status", post(game_status))
        .with_state(state)
        .layer(cors)
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    service: &'static str,
    dependencies: HealthDependencies,
}

#[derive(Serialize)]
struct HealthDependencies {
    engine: &'static str,
}

/// `{"status": "ok" | "degraded", "service": "chess-mcp-engine",
/// "dependencies": {"engine": "ok" | "error"}}`. Degraded (HTTP 503) when
/// the engine is not ready.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthBody>) {
    let engine_ready = state.facade.is_ready().await;
    let body = HealthBody {
        status: if engine_ready { "ok" } else { "degraded" },
        service: "chess-mcp-engine",
        dependencies: HealthDependencies {
            engine: if engine_ready { "ok" } else { "error" },
        },
    };
    let code = if engine_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(body))
}

/// Plain liveness probe, independent of engine readiness.
async fn ready() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ping": "pong" }))
}

#[derive(Deserialize)]
struct ChessMoveRequest {
    fen: String,
    #[serde(default)]
    move_history: Vec<String>,
}

#[derive(Deserialize)]
struct PositionRequest {
    fen: String,
}

#[derive(Deserialize)]
struct ValidateMoveRequest {
    fen: String,
    #[serde(rename = "move")]
    mv: String,
}

async fn get_best_move(
    State(state): State<AppState>,
    Json(request): Json<ChessMoveRequest>,
) -> Json<serde_json::Value> {
    match state
        .facade
        .get_best_move(&request.fen, &request.move_history)
        .await
    {
        Ok(result) => Json(serde_json::json!({ "result": result })),
        Err(err) => Json(serde_json::json!({ "error": err })),
    }
}

async fn validate_move(
    State(state): State<AppState>,
    Json(request): Json<ValidateMoveRequest>,
) -> Json<serde_json::Value> {
    match state.facade.validate_move(&request.fen, &request.mv) {
        Ok(result) => Json(serde_json::json!({ "result": result })),
        Err(err) => Json(serde_json::json!({ "error": err })),
    }
}

async fn legal_moves(
    State(state): State<AppState>,
    Json(request): Json<PositionRequest>,
) -> Json<serde_json::Value> {
    match state.facade.legal_moves(&request.fen) {
        Ok(result) => Json(serde_json::json!({ "result": result })),
        Err(err) => Json(serde_json::json!({ "error": err })),
    }
}

async fn game_status(
    State(state): State<AppState>,
    Json(request): Json<PositionRequest>,
) -> Json<serde_json::Value> {
    match state.facade.game_status(&request.fen) {
        Ok(result) => Json(serde_json::json!({ "result": result })),
        Err(err) => Json(serde_json::json!({ "error": err })),
    }
}
