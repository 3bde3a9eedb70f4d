use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde_json::Value;
use std::sync::Arc;

use crate::{ApiResult, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/v1/rube/recipe-hub/discover", get(discover_handler))
}

/// Forward the query string untouched; the upstream body comes back as-is.
async fn discover_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Value>> {
    state.metrics.inc_gateway_requests();
    Ok(Json(state.rube.discover(&query).await?))
}
