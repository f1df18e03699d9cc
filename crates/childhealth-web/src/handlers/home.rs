//! Landing page.

use axum::extract::State;
use axum::response::Response;
use minijinja::context;

use crate::state::SharedState;

pub async fn home_page(State(state): State<SharedState>) -> Response {
    state.templates.page(
        "home.html",
        context! {
            active => "home",
            model_loaded => state.predictor.is_model_loaded(),
            assistant_status => state.assistant.status().to_string(),
        },
    )
}
