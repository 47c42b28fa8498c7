//! HTTP API server for integration with other systems.
//!
//! Exposes the ask/fetch/status/reset pipeline as REST endpoints. Internal
//! errors surface as 500 responses carrying the error message; finer-grained
//! status mapping is left to callers.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(settings).await?;

    let state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .route("/fetch", post(fetch))
        .route("/status", get(status))
        .route("/config", get(config))
        .route("/reset", post(reset))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("threadwise API server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Ask", "POST /ask");
    Output::kv("Fetch", "POST /fetch");
    Output::kv("Status", "GET  /status");
    Output::kv("Config", "GET  /config");
    Output::kv("Reset", "POST /reset");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    text: String,
}

#[derive(Serialize)]
struct AskResponse {
    response: String,
}

#[derive(Deserialize)]
struct FetchRequest {
    days: u32,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct ConfigResponse {
    llm_backend: String,
    model_name: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn internal_error(e: impl std::fmt::Display) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> impl IntoResponse {
    match state.orchestrator.ask(&req.text).await {
        Ok(response) => Json(AskResponse { response }).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn fetch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FetchRequest>,
) -> impl IntoResponse {
    match state.orchestrator.fetch(req.days).await {
        Ok(_) => Json(MessageResponse {
            message: format!("Successfully fetched {} days of data", req.days),
        })
        .into_response(),
        Err(e) => internal_error(e),
    }
}

async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.orchestrator.status().await {
        Ok(status) => Json(status).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let settings = state.orchestrator.settings();
    Json(ConfigResponse {
        llm_backend: settings.backend.kind.to_string(),
        model_name: settings.active_model().to_string(),
    })
}

async fn reset(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.orchestrator.reset().await {
        Ok(_) => Json(MessageResponse {
            message: "Successfully reset vector store".to_string(),
        })
        .into_response(),
        Err(e) => internal_error(e),
    }
}
