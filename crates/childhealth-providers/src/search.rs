//! The provider-search action as the page sees it.

use serde::Serialize;
use tracing::{info, warn};

use crate::npi::{ProviderQuery, ProviderSource};
use crate::record::{format_provider_results, ProviderRecord};
use crate::taxonomy::taxonomy_code;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// City, state or condition left blank; nothing to show.
    NoInput,
    UnknownCondition { condition: String },
    NoResults { condition: String, city: String, state: String },
    Found {
        condition: String,
        city: String,
        state: String,
        providers: Vec<ProviderRecord>,
    },
}

impl SearchOutcome {
    /// User-facing notice for the non-success outcomes.
    pub fn notice(&self) -> Option<String> {
        match self {
            SearchOutcome::NoInput | SearchOutcome::Found { .. } => None,
            SearchOutcome::UnknownCondition { .. } => {
                Some("No taxonomy code found for the selected condition.".to_string())
            }
            SearchOutcome::NoResults { condition, city, state } => {
                Some(format!("No providers found for {condition} in {city}, {state}."))
            }
        }
    }

    pub fn providers(&self) -> &[ProviderRecord] {
        match self {
            SearchOutcome::Found { providers, .. } => providers,
            _ => &[],
        }
    }
}

/// Look up providers for a condition near a city. Registry failures are
/// logged and reported as `NoResults`.
pub async fn find_providers(
    source: &dyn ProviderSource,
    condition: &str,
    city: &str,
    state: &str,
) -> SearchOutcome {
    let (condition, city, state) = (condition.trim(), city.trim(), state.trim());
    if condition.is_empty() || city.is_empty() || state.is_empty() {
        return SearchOutcome::NoInput;
    }

    let Some(code) = taxonomy_code(condition) else {
        warn!(condition, "no taxonomy code for condition");
        return SearchOutcome::UnknownCondition { condition: condition.to_string() };
    };

    let query = ProviderQuery {
        taxonomy_code: code.to_string(),
        city: city.to_string(),
        state: state.to_string(),
    };

    let providers = match source.search(&query).await {
        Ok(resp) => format_provider_results(&resp),
        Err(e) => {
            warn!(error = %e, condition, city, state, "provider search failed");
            Vec::new()
        }
    };

    info!(condition, city, state, n = providers.len(), "provider search done");

    if providers.is_empty() {
        SearchOutcome::NoResults {
            condition: condition.to_string(),
            city: city.to_string(),
            state: state.to_string(),
        }
    } else {
        SearchOutcome::Found {
            condition: condition.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            providers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npi::StaticProviderSource;
    use serde_json::json;

    fn one_hit() -> StaticProviderSource {
        StaticProviderSource::new(json!({
            "result_count": 1,
            "results": [ { "number": "1", "basic": { "first_name": "A", "last_name": "B" } } ]
        }))
    }

    #[tokio::test]
    async fn test_blank_input_is_noop() {
        let src = one_hit();
        assert_eq!(find_providers(&src, "Asthma", "", "TX").await, SearchOutcome::NoInput);
        assert_eq!(find_providers(&src, "", "Austin", "TX").await, SearchOutcome::NoInput);
        assert_eq!(find_providers(&src, "Asthma", "Austin", " ").await, SearchOutcome::NoInput);
    }

    #[tokio::test]
    async fn test_unknown_condition() {
        let out = find_providers(&one_hit(), "Flu", "Austin", "TX").await;
        assert!(matches!(out, SearchOutcome::UnknownCondition { .. }));
        assert!(out.notice().unwrap().contains("No taxonomy code"));
    }

    #[tokio::test]
    async fn test_found() {
        let out = find_providers(&one_hit(), "ADD/ADHD", "Austin", "TX").await;
        assert_eq!(out.providers().len(), 1);
        assert_eq!(out.providers()[0].name, "A B");
        assert!(out.notice().is_none());
    }

    #[tokio::test]
    async fn test_source_failure_reads_as_no_results() {
        let out = find_providers(&StaticProviderSource::failing(), "Asthma", "Austin", "TX").await;
        assert_eq!(
            out.notice().as_deref(),
            Some("No providers found for Asthma in Austin, TX.")
        );
    }

    #[tokio::test]
    async fn test_zero_results() {
        let src = StaticProviderSource::new(json!({ "result_count": 0, "results": [] }));
        let out = find_providers(&src, "Speech Disorder", "Dallas", "TX").await;
        assert!(matches!(out, SearchOutcome::NoResults { .. }));
    }
}
