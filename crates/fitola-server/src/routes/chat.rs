use axum::{Router, extract::State, response::Json, routing::post};
use fitola_prompt::{language_instruction, sanitize_language_identifier};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{ApiResult, AppState};

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    language: Option<String>,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

#[derive(Deserialize)]
struct TranslationRequest {
    text: String,
    source_language: String,
    target_language: String,
}

#[derive(Serialize)]
struct TranslationResponse {
    translation: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/chat", post(chat_handler))
        .route("/api/v1/translate", post(translate_handler))
}

async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    state.metrics.inc_chat_messages();
    let instruction = language_instruction(req.language.as_deref());
    let prompt = if instruction.is_empty() {
        req.message
    } else {
        format!("{instruction}\n\n{}", req.message)
    };
    let response = state.generate(prompt).await?;
    Ok(Json(ChatResponse { response }))
}

async fn translate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranslationRequest>,
) -> ApiResult<Json<TranslationResponse>> {
    let source = sanitize_language_identifier(&req.source_language, 40);
    let target = sanitize_language_identifier(&req.target_language, 40);
    let prompt = format!(
        "Translate the following text from {source} to {target}. Return only the translated text.\n\n{}",
        req.text
    );
    let translation = state.generate(prompt).await?;
    Ok(Json(TranslationResponse { translation }))
}
