//! NPI Registry API client.
//!
//! API docs: https://npiregistry.cms.hhs.gov/api-page
//! Endpoint: https://npiregistry.cms.hhs.gov/api/?version=2.1

use std::time::Duration;

use async_trait::async_trait;
use childhealth_common::config::ProvidersConfig;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{ProviderError, Result};

/// One registry search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    pub taxonomy_code: String,
    pub city: String,
    pub state: String,
}

/// Anything that can answer a provider search with a registry-shaped response.
#[async_trait]
pub trait ProviderSource: Send + Sync {
    async fn search(&self, query: &ProviderQuery) -> Result<Value>;
}

pub struct NpiRegistryClient {
    client: Client,
    base_url: String,
    api_version: String,
    limit: u32,
}

impl NpiRegistryClient {
    pub fn new(cfg: &ProvidersConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(concat!("childhealth/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.clone(),
            api_version: cfg.api_version.clone(),
            limit: cfg.limit,
        })
    }

    /// Query string for a search. City and state are upper-cased, blank ones
    /// are left out.
    pub fn query_params(&self, query: &ProviderQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("version", self.api_version.clone()),
            ("limit", self.limit.to_string()),
        ];
        if !query.taxonomy_code.is_empty() {
            params.push(("taxonomy_code", query.taxonomy_code.clone()));
        }
        let city = query.city.trim();
        if !city.is_empty() {
            params.push(("city", city.to_uppercase()));
        }
        let state = query.state.trim();
        if !state.is_empty() {
            params.push(("state", state.to_uppercase()));
        }
        params
    }
}

#[async_trait]
impl ProviderSource for NpiRegistryClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &ProviderQuery) -> Result<Value> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&self.query_params(query))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = resp.json::<Value>().await?;
        if let Some(errors) = body.get("Errors") {
            return Err(ProviderError::Registry(errors.to_string()));
        }

        debug!(
            result_count = body["result_count"].as_u64().unwrap_or(0),
            "NPI registry response"
        );
        Ok(body)
    }
}

// ── Mock Implementation for Testing ────────────────────────────────────────

/// Source that returns a canned response (or a canned failure) for every query.
pub struct StaticProviderSource {
    response: Option<Value>,
}

impl StaticProviderSource {
    pub fn new(response: Value) -> Self {
        Self { response: Some(response) }
    }

    pub fn failing() -> Self {
        Self { response: None }
    }
}

#[async_trait]
impl ProviderSource for StaticProviderSource {
    async fn search(&self, _query: &ProviderQuery) -> Result<Value> {
        self.response
            .clone()
            .ok_or_else(|| ProviderError::Registry("static source failure".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_params() {
        let client = NpiRegistryClient::new(&ProvidersConfig::default()).unwrap();
        let params = client.query_params(&ProviderQuery {
            taxonomy_code: "2084P0804X".into(),
            city: " Austin ".into(),
            state: "tx".into(),
        });
        assert_eq!(
            params,
            vec![
                ("version", "2.1".to_string()),
                ("limit", "5".to_string()),
                ("taxonomy_code", "2084P0804X".to_string()),
                ("city", "AUSTIN".to_string()),
                ("state", "TX".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_location_omitted() {
        let client = NpiRegistryClient::new(&ProvidersConfig::default()).unwrap();
        let params = client.query_params(&ProviderQuery {
            taxonomy_code: "261QM0801X".into(),
            city: "  ".into(),
            state: String::new(),
        });
        assert!(params.iter().all(|(k, _)| *k != "city" && *k != "state"));
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_error() {
        let cfg = ProvidersConfig {
            base_url: "http://127.0.0.1:9/api/".into(),
            timeout_secs: 2,
            ..ProvidersConfig::default()
        };
        let client = NpiRegistryClient::new(&cfg).unwrap();
        let q = ProviderQuery {
            taxonomy_code: "2084P0804X".into(),
            city: "AUSTIN".into(),
            state: "TX".into(),
        };
        assert!(client.search(&q).await.is_err());
    }
}
