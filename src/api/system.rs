use axum::{Json, extract::State};
use serde_json::{Value, json};
use std::sync::Arc;

use super::{ApiError, AppState};

pub async fn health_live(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "alive",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    }))
}

pub async fn health_ready(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state.shared.store.ping().await?;
    Ok(Json(json!({ "status": "ready" })))
}
