use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::{get, post},
};
use fitola_memory::ContextEntry;
use fitola_prompt::Fields;
use fitola_workflow::{SessionInfo, WorkflowSession, WorkflowType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{ApiError, ApiResult, AppState};

#[derive(Deserialize)]
pub(crate) struct WorkflowRequest {
    pub user_id: String,
    pub workflow_type: String,
    #[serde(default)]
    pub user_data: Fields,
    #[serde(default)]
    pub parameters: Fields,
}

#[derive(Serialize)]
struct WorkflowList {
    workflows: Vec<String>,
}

#[derive(Serialize)]
struct UserMemory {
    user_id: String,
    count: usize,
    history: Vec<ContextEntry>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/simpleclaw/workflows", get(list_handler))
        .route("/api/v1/simpleclaw/workflow", post(start_handler))
        .route("/api/v1/simpleclaw/session/{session_id}", get(session_handler))
        .route("/api/v1/simpleclaw/memory/{user_id}", get(memory_handler))
}

async fn list_handler() -> Json<WorkflowList> {
    Json(WorkflowList {
        workflows: WorkflowType::names(),
    })
}

async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WorkflowRequest>,
) -> ApiResult<Json<WorkflowSession>> {
    let session = state
        .simpleclaw
        .start_workflow(
            &req.user_id,
            &req.workflow_type,
            &req.user_data,
            &req.parameters,
        )
        .await?;
    state.metrics.inc_workflow_runs();
    Ok(Json(session))
}

async fn session_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionInfo>> {
    state
        .simpleclaw
        .session(&session_id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Session not found".into()))
}

async fn memory_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<UserMemory> {
    let history = state.simpleclaw.user_memory(&user_id);
    Json(UserMemory {
        user_id,
        count: history.len(),
        history,
    })
}
