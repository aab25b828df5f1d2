//! HTTP Endpoints
//!
//! REST API for the honeypot agent.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use honeypot_core::ConversationView;

use crate::auth::auth_middleware;
use crate::metrics::{metrics_handler, record_request};
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let timeout = Duration::from_secs(server.timeout_seconds);

    Router::new()
        .route("/", get(usage))
        .route("/api/honeypot", post(handle_message))
        .route("/api/conversations", get(list_conversations))
        .route(
            "/api/conversations/:id",
            get(get_conversation).delete(delete_conversation),
        )
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns a permissive layer (for dev)
/// - If no valid origins are configured, defaults to localhost:3000
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No valid CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin(HeaderValue::from_static("http://localhost:3000"))
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Inbound message payload
#[derive(Debug, Deserialize)]
pub struct HoneypotRequest {
    pub conversation_id: String,
    pub message: MessageBody,
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub text: String,
}

/// Engine view plus the handoff flag
#[derive(Debug, Serialize)]
pub struct HoneypotResponse {
    #[serde(flatten)]
    pub view: ConversationView,
    /// Whether a downstream agent should take over
    pub agent_handoff: bool,
}

/// POST /api/honeypot
async fn handle_message(
    State(state): State<AppState>,
    Json(request): Json<HoneypotRequest>,
) -> Result<Json<HoneypotResponse>, ServerError> {
    if request.conversation_id.trim().is_empty() {
        record_request("honeypot", StatusCode::BAD_REQUEST);
        return Err(ServerError::InvalidRequest(
            "conversation_id must not be empty".to_string(),
        ));
    }

    let view = state
        .engine
        .handle_message(&request.conversation_id, &request.message.text);

    record_request("honeypot", StatusCode::OK);
    Ok(Json(HoneypotResponse {
        agent_handoff: view.scam_detected,
        view,
    }))
}

/// GET /api/conversations/:id
async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationView>, ServerError> {
    state
        .engine
        .snapshot(&id)
        .map(Json)
        .ok_or(ServerError::NotFound(id))
}

/// DELETE /api/conversations/:id
async fn delete_conversation(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.engine.store().remove(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// GET /api/conversations
async fn list_conversations(State(state): State<AppState>) -> Json<serde_json::Value> {
    let conversations = state.engine.store().list();
    Json(serde_json::json!({
        "count": conversations.len(),
        "conversations": conversations,
    }))
}

/// GET /
async fn usage() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "scam-honeypot-agent",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /api/honeypot": "Send one scammer message, receive the agent reply and beliefs",
            "GET /api/conversations": "Active conversations",
            "GET /api/conversations/:id": "Current state of a conversation",
            "DELETE /api/conversations/:id": "Drop a conversation",
            "GET /health": "Liveness",
            "GET /ready": "Readiness",
            "GET /metrics": "Prometheus metrics"
        },
        "example_payload": {
            "conversation_id": "conv_1",
            "message": {
                "text": "Your bank account is blocked. Verify now."
            }
        }
    }))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn readiness_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = state.engine.store();
    Json(serde_json::json!({
        "status": "ready",
        "checks": {
            "conversations": {
                "status": "ok",
                "count": store.len(),
                "capacity": store.config().max_conversations,
            },
            "metrics": {
                "status": if state.metrics.is_some() { "ok" } else { "disabled" },
            }
        }
    }))
}
