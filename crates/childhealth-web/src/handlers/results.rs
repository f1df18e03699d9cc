//! Results page: the stored payload, ranked and charted.

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use childhealth_ranker::{present, ResultsView};
use minijinja::context;
use serde::Serialize;

use crate::session::SESSION_COOKIE;
use crate::state::SharedState;

/// A chart bar with its rendered width.
#[derive(Debug, Serialize)]
struct BarRow {
    condition: String,
    text: String,
    color: &'static str,
    width: f64,
}

fn bar_rows(view: &ResultsView) -> Vec<BarRow> {
    match view {
        ResultsView::NoData { .. } => Vec::new(),
        ResultsView::HasData { chart, .. } => chart
            .bars
            .iter()
            .map(|bar| BarRow {
                condition: bar.condition.clone(),
                text: bar.text.clone(),
                color: bar.color,
                width: (chart.width_pct(bar) * 10.0).round() / 10.0,
            })
            .collect(),
    }
}

/// Results view for the requesting session. A request without a session
/// cookie has nothing stored.
fn session_view(state: &SharedState, jar: &CookieJar) -> ResultsView {
    let raw = jar
        .get(SESSION_COOKIE)
        .and_then(|c| state.results.get(c.value()));
    present(raw.as_deref())
}

pub async fn results_page(State(state): State<SharedState>, jar: CookieJar) -> Response {
    let view = session_view(&state, &jar);
    let generated_at = match &view {
        ResultsView::HasData { timestamp, .. } => timestamp.clone(),
        ResultsView::NoData { .. } => None,
    };
    state.templates.page(
        "results.html",
        context! {
            active => "results",
            bars => bar_rows(&view),
            generated_at => generated_at,
            view => view,
        },
    )
}

pub async fn api_results(State(state): State<SharedState>, jar: CookieJar) -> Json<ResultsView> {
    Json(session_view(&state, &jar))
}
