//! Provider search page and API.

use axum::extract::{Query, State};
use axum::response::Response;
use axum::{Form, Json};
use childhealth_common::Condition;
use childhealth_providers::{find_providers, SearchOutcome, DEFAULT_STATE, US_STATES};
use minijinja::context;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProviderSearch {
    pub condition: String,
    pub city: String,
    pub state: String,
}

fn states() -> Vec<Value> {
    US_STATES.iter().map(|s| json!({ "code": s.code, "name": s.name })).collect()
}

fn render(state: &SharedState, search: &ProviderSearch, outcome: Option<&SearchOutcome>) -> Response {
    let condition = if search.condition.is_empty() {
        Condition::ALL[0].name().to_string()
    } else {
        search.condition.clone()
    };
    let us_state = if search.state.is_empty() { DEFAULT_STATE } else { search.state.as_str() };

    state.templates.page(
        "find_doc.html",
        context! {
            active => "find_doc",
            conditions => Condition::names(),
            states => states(),
            condition => condition,
            city => search.city.trim(),
            state => us_state.trim().to_uppercase(),
            notice => outcome.and_then(SearchOutcome::notice),
            providers => outcome.map(SearchOutcome::providers).unwrap_or_default(),
        },
    )
}

pub async fn find_doc_page(State(state): State<SharedState>) -> Response {
    render(&state, &ProviderSearch::default(), None)
}

pub async fn find_doc_submit(
    State(state): State<SharedState>,
    Form(search): Form<ProviderSearch>,
) -> Response {
    let outcome =
        find_providers(state.providers.as_ref(), &search.condition, &search.city, &search.state)
            .await;
    render(&state, &search, Some(&outcome))
}

pub async fn api_providers(
    State(state): State<SharedState>,
    Query(search): Query<ProviderSearch>,
) -> Json<SearchOutcome> {
    Json(find_providers(state.providers.as_ref(), &search.condition, &search.city, &search.state).await)
}
