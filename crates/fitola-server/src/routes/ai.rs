use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::{get, post},
};
use fitola_prompt::Fields;
use fitola_workflow::{
    FeedbackAck, LearningExecution, LearningStats, OrchestratedWorkflow, ProactiveInsights,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::simpleclaw::WorkflowRequest;
use crate::{ApiResult, AppState};

#[derive(Deserialize)]
struct InsightsRequest {
    user_id: String,
    #[serde(default)]
    context: Fields,
}

#[derive(Deserialize)]
struct FeedbackRequest {
    user_id: String,
    workflow_id: String,
    #[serde(default)]
    feedback: Value,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/ai/execute", post(execute_handler))
        .route("/api/v1/ai/insights", post(insights_handler))
        .route("/api/v1/ai/feedback", post(feedback_handler))
        .route("/api/v1/ai/stats/{user_id}", get(stats_handler))
}

async fn execute_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WorkflowRequest>,
) -> ApiResult<Json<LearningExecution>> {
    let workflow: OrchestratedWorkflow = req.workflow_type.parse()?;
    let execution = state
        .orchestrator
        .execute_with_learning(&req.user_id, workflow, &req.user_data, &req.parameters)
        .await?;
    state.metrics.inc_workflow_runs();
    Ok(Json(execution))
}

async fn insights_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InsightsRequest>,
) -> Json<ProactiveInsights> {
    Json(
        state
            .orchestrator
            .proactive_insights(&req.user_id, &req.context)
            .await,
    )
}

async fn feedback_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FeedbackRequest>,
) -> Json<FeedbackAck> {
    Json(
        state
            .orchestrator
            .provide_feedback(&req.user_id, &req.workflow_id, &req.feedback)
            .await,
    )
}

async fn stats_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<LearningStats> {
    Json(state.orchestrator.learning_stats(&user_id).await)
}
