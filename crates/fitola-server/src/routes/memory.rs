use axum::{Router, extract::State, response::Json, routing::post};
use fitola_memory::{DEFAULT_RETRIEVE_LIMIT, MemorizeAck, MemoryCategory, MemoryRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::AppState;

#[derive(Deserialize)]
struct MemorizeRequest {
    user_id: String,
    interaction_type: String,
    content: Value,
    #[serde(default)]
    category: MemoryCategory,
}

#[derive(Deserialize)]
struct RetrieveRequest {
    user_id: String,
    #[serde(default)]
    query: String,
    category: Option<MemoryCategory>,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_RETRIEVE_LIMIT
}

#[derive(Serialize)]
struct RetrieveResponse {
    count: usize,
    memories: Vec<MemoryRecord>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/memory/memorize", post(memorize_handler))
        .route("/api/v1/memory/retrieve", post(retrieve_handler))
}

async fn memorize_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MemorizeRequest>,
) -> Json<MemorizeAck> {
    Json(
        state
            .memory
            .memorize(&req.user_id, &req.interaction_type, &req.content, req.category)
            .await,
    )
}

async fn retrieve_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RetrieveRequest>,
) -> Json<RetrieveResponse> {
    let memories = state
        .memory
        .retrieve(&req.user_id, &req.query, req.category, req.limit)
        .await;
    Json(RetrieveResponse {
        count: memories.len(),
        memories,
    })
}
