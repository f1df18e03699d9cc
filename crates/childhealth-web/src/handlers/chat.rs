//! Document assistant chat: page, form posts and JSON API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use axum_extra::extract::cookie::CookieJar;
use childhealth_docchat::AssistantStatus;
use minijinja::context;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::session::{session_id, SESSION_COOKIE};
use crate::state::SharedState;

/// Assistant status as the browser sees it.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub status: AssistantStatus,
    pub message: String,
    pub icon: &'static str,
    pub ready: bool,
    pub failed: bool,
}

impl From<&AssistantStatus> for StatusView {
    fn from(status: &AssistantStatus) -> Self {
        Self {
            status: status.clone(),
            message: status.to_string(),
            icon: status.icon(),
            ready: status.is_ready(),
            failed: status.is_failed(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

pub async fn chat_page(State(state): State<SharedState>, jar: CookieJar) -> Response {
    let history = jar
        .get(SESSION_COOKIE)
        .map(|c| state.chats.history(c.value()))
        .unwrap_or_default();
    let status = state.assistant.status();
    state.templates.page(
        "chat.html",
        context! {
            active => "chat",
            history => history,
            status => status.to_string(),
            status_icon => status.icon(),
        },
    )
}

/// Ask the assistant and append the exchange to the session's transcript.
/// A blank message does nothing.
pub async fn chat_submit(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(req): Form<ChatRequest>,
) -> impl IntoResponse {
    let (jar, session) = session_id(jar);
    if let Some(reply) = state.assistant.ask(&req.message).await {
        state.chats.push_exchange(&session, req.message.trim(), reply.text());
    }
    (jar, Redirect::to("/chat"))
}

pub async fn chat_clear(State(state): State<SharedState>, jar: CookieJar) -> Redirect {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.chats.clear(cookie.value());
    }
    Redirect::to("/chat")
}

pub async fn api_chat_status(State(state): State<SharedState>) -> Json<StatusView> {
    Json(StatusView::from(&state.assistant.status()))
}

pub async fn api_chat(
    State(state): State<SharedState>,
    jar: CookieJar,
    Json(req): Json<ChatRequest>,
) -> Response {
    let (jar, session) = session_id(jar);
    match state.assistant.ask(&req.message).await {
        Some(reply) => {
            let text = reply.text();
            state.chats.push_exchange(&session, req.message.trim(), text.clone());
            (jar, Json(json!({ "reply": text, "kind": reply.kind() }))).into_response()
        }
        None => (jar, StatusCode::NO_CONTENT).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use childhealth_docchat::LoadingStage;

    #[test]
    fn test_status_view() {
        let v = StatusView::from(&AssistantStatus::Loading(LoadingStage::BuildingIndex));
        assert_eq!(v.message, "Building search index...");
        assert!(!v.ready && !v.failed);

        let v = StatusView::from(&AssistantStatus::Failed("no docs".into()));
        assert_eq!(v.message, "Failed - no docs");
        assert!(v.failed);
        assert_eq!(
            serde_json::to_value(&v).unwrap()["status"],
            json!({ "state": "failed", "detail": "no docs" })
        );
    }
}
