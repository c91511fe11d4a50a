pub mod taxonomy;

use crate::web::error::AppResult;
use crate::web::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use std::sync::Arc;

/// GET /healthz
pub async fn healthz(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    state.db.health_check()?;
    Ok(Json(json!({ "status": "ok" })).into_response())
}
