//! HTTP API server for question answering.
//!
//! Provides the liveness, configuration and prompt endpoints.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::TalkRagError;
use crate::rag::{QueryService, RagResponse};
use crate::services::Services;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared application state.
pub struct AppState {
    service: QueryService,
    stats: StatsResponse,
}

impl AppState {
    pub fn new(service: QueryService, settings: &Settings) -> Self {
        Self {
            stats: StatsResponse::from_settings(settings, service.top_k()),
            service,
        }
    }
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let services = Services::connect(&settings).await?;
    let service = services.query_service(&settings)?;
    let state = Arc::new(AppState::new(service, &settings));

    let app = build_router(state);

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    Output::header("talkrag API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Info", "GET  /");
    Output::kv("Stats", "GET  /api/stats");
    Output::kv("Ask (RAG)", "POST /api/prompt");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router around shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/api/stats", get(stats))
        .route("/api/prompt", post(prompt))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Serialize)]
struct RootResponse {
    message: String,
}

/// Static echo of the retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsResponse {
    pub chunk_size: u32,
    pub overlap_ratio: f64,
    pub top_k: usize,
}

impl StatsResponse {
    pub fn from_settings(settings: &Settings, top_k: usize) -> Self {
        Self {
            chunk_size: settings.chunking.chunk_size_tokens,
            overlap_ratio: settings.chunking.overlap_ratio(),
            top_k,
        }
    }
}

#[derive(Deserialize)]
struct PromptRequest {
    question: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Maps library errors onto HTTP status codes.
struct ApiError(TalkRagError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!("Request failed: {}", self.0);
            StatusCode::BAD_GATEWAY
        };
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

const ROOT_MESSAGE: &str =
    "TED Talk RAG API is running. Use /api/prompt for queries or /api/stats for configuration.";

async fn root() -> impl IntoResponse {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

async fn stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.stats.clone())
}

async fn prompt(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<RagResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        ApiError(TalkRagError::InvalidInput(format!(
            "body must be a JSON object with a string \"question\" ({})",
            rejection.body_text()
        )))
    })?;
    let response = state.service.ask(&req.question).await.map_err(ApiError)?;
    Ok(Json(response))
}
