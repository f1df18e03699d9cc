//! Questionnaire page and prediction submission.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use axum_extra::extract::cookie::CookieJar;
use childhealth_common::{FormAnswers, FormError, FormSection};
use minijinja::context;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::handlers::ApiError;
use crate::session::session_id;
use crate::state::SharedState;

#[derive(Serialize)]
struct OptionView {
    label: &'static str,
    code: u8,
    selected: bool,
}

#[derive(Serialize)]
struct FieldView {
    name: &'static str,
    label: &'static str,
    options: Vec<OptionView>,
}

#[derive(Serialize)]
struct SectionView {
    title: &'static str,
    fields: Vec<FieldView>,
}

fn sections() -> Vec<SectionView> {
    FormSection::ALL
        .into_iter()
        .map(|section| SectionView {
            title: section.title(),
            fields: section
                .fields()
                .map(|field| FieldView {
                    name: field.name(),
                    label: field.label(),
                    options: field
                        .options()
                        .iter()
                        .map(|&(label, code)| OptionView {
                            label,
                            code,
                            selected: code == field.default_code(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

pub async fn predictor_page(State(state): State<SharedState>) -> Response {
    state.templates.page(
        "predictor.html",
        context! { active => "predictor", sections => sections() },
    )
}

/// Score the submitted form and store the payload for the session.
///
/// Missing or invalid answers are a no-op: nothing is stored and the user is
/// sent back to the form.
pub async fn predictor_submit(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let (jar, session) = session_id(jar);

    let answers = match FormAnswers::from_lookup(|name| form.get(name).map(String::as_str)) {
        Ok(a) => a,
        Err(e) => {
            debug!(error = %e, "questionnaire incomplete, nothing stored");
            return (jar, Redirect::to("/predictor"));
        }
    };

    let payload = state.predictor.predict(answers).await;
    match payload.to_json() {
        Ok(raw) => {
            info!(source = ?payload.score_source, "prediction stored");
            state.results.set(&session, raw);
            (jar, Redirect::to("/results"))
        }
        Err(e) => {
            error!(error = %e, "could not serialise prediction payload");
            (jar, Redirect::to("/predictor"))
        }
    }
}

/// JSON form of a field value; numbers and strings are both accepted.
fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub async fn api_predict(
    State(state): State<SharedState>,
    jar: CookieJar,
    Json(body): Json<HashMap<String, Value>>,
) -> Response {
    let (jar, session) = session_id(jar);
    let fields: HashMap<&str, String> = body
        .iter()
        .filter_map(|(k, v)| value_text(v).map(|t| (k.as_str(), t)))
        .collect();

    let answers = match FormAnswers::from_lookup(|name| fields.get(name).map(String::as_str)) {
        Ok(a) => a,
        Err(FormError::Missing(field)) => {
            debug!(field = %field, "api prediction skipped, field missing");
            return (jar, StatusCode::NO_CONTENT).into_response();
        }
        Err(e @ FormError::Invalid { .. }) => {
            return ApiError::unprocessable(e.to_string()).into_response();
        }
    };

    let payload = state.predictor.predict(answers).await;
    match payload.to_json() {
        Ok(raw) => {
            state.results.set(&session, raw);
            (jar, Json(payload)).into_response()
        }
        Err(e) => ApiError::internal(e.to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use childhealth_common::{FormField, FIELD_COUNT};

    #[test]
    fn test_sections_cover_every_field_once() {
        let s = sections();
        assert_eq!(s.len(), 6);
        let names: Vec<&str> = s.iter().flat_map(|s| s.fields.iter().map(|f| f.name)).collect();
        assert_eq!(names.len(), FIELD_COUNT);
        for field in FormField::ALL {
            assert!(names.contains(&field.name()), "{field}");
        }
    }

    #[test]
    fn test_first_option_is_selected() {
        for section in sections() {
            for field in section.fields {
                let selected: Vec<_> = field.options.iter().filter(|o| o.selected).collect();
                assert_eq!(selected.len(), 1, "{}", field.name);
                assert!(field.options[0].selected);
            }
        }
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&serde_json::json!(3)).as_deref(), Some("3"));
        assert_eq!(value_text(&serde_json::json!("2")).as_deref(), Some("2"));
        assert_eq!(value_text(&serde_json::json!(null)), None);
    }
}
