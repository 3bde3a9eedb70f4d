use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::messages::DirectMessage;
use crate::{ApiError, ApiResult, AppState};

#[derive(Deserialize)]
struct SendRequest {
    from_user_id: String,
    to_user_id: String,
    text: String,
}

#[derive(Deserialize)]
struct ListParams {
    with: Option<String>,
}

#[derive(Serialize)]
struct MessageList {
    user_id: String,
    messages: Vec<DirectMessage>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/messages", post(send_handler))
        .route("/api/v1/messages/{user_id}", get(list_handler))
}

async fn send_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendRequest>,
) -> ApiResult<(StatusCode, Json<DirectMessage>)> {
    if req.text.trim().is_empty() {
        return Err(ApiError::Unprocessable("text: must not be empty".into()));
    }
    let message = state
        .messages
        .send(&req.from_user_id, &req.to_user_id, &req.text);
    Ok((StatusCode::CREATED, Json(message)))
}

async fn list_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Json<MessageList> {
    let messages = state.messages.for_user(&user_id, params.with.as_deref());
    Json(MessageList { user_id, messages })
}
