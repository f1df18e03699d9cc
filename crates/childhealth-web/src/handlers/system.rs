//! Liveness endpoint.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::handlers::chat::StatusView;
use crate::state::SharedState;

pub async fn api_health(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model_loaded": state.predictor.is_model_loaded(),
        "assistant": StatusView::from(&state.assistant.status()),
    }))
}
