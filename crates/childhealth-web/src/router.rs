//! Axum router: maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    services::ServeDir,
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    home::home_page,
    predictor::{predictor_page, predictor_submit, api_predict},
    results::{results_page, api_results},
    providers::{find_doc_page, find_doc_submit, api_providers},
    chat::{chat_page, chat_submit, chat_clear, api_chat_status, api_chat},
    system::api_health,
};
use crate::sse::chat_status_events;

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.server.static_dir);
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",           get(home_page))
        .route("/predictor",  get(predictor_page).post(predictor_submit))
        .route("/results",    get(results_page))
        .route("/findDoc",    get(find_doc_page).post(find_doc_submit))
        .route("/chat",       get(chat_page).post(chat_submit))
        .route("/chat/clear", post(chat_clear))

        // SSE streaming
        .route("/api/chat/events", get(chat_status_events))

        // API endpoints
        .route("/api/predict",     post(api_predict))
        .route("/api/results",     get(api_results))
        .route("/api/providers",   get(api_providers))
        .route("/api/chat/status", get(api_chat_status))
        .route("/api/chat",        post(api_chat))
        .route("/api/health",      get(api_health))

        // Static files
        .nest_service("/static", static_dir)

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
