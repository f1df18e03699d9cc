//! Shared application state for the web server.

use std::sync::Arc;

use childhealth_common::AppConfig;
use childhealth_docchat::DocAssistant;
use childhealth_model::Predictor;
use childhealth_providers::{NpiRegistryClient, ProviderSource};

use crate::session::{ChatHistoryStore, InMemoryResultStore, ResultStore, SessionLimits};
use crate::templates::Templates;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub config: AppConfig,
    pub predictor: Predictor,
    /// Prediction payload slot per session
    pub results: Arc<dyn ResultStore>,
    pub chats: ChatHistoryStore,
    pub providers: Arc<dyn ProviderSource>,
    pub assistant: Arc<DocAssistant>,
    pub templates: Templates,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        predictor: Predictor,
        providers: Arc<dyn ProviderSource>,
        assistant: Arc<DocAssistant>,
    ) -> anyhow::Result<Self> {
        let limits = SessionLimits::from_config(&config.server);
        Ok(Self {
            config,
            predictor,
            results: Arc::new(InMemoryResultStore::with_limits(limits)),
            chats: ChatHistoryStore::with_limits(limits),
            providers,
            assistant,
            templates: Templates::new()?,
        })
    }

    /// Wire the real collaborators from configuration. The model is loaded
    /// here (falling back if unavailable); the assistant is built but not
    /// started.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let predictor = Predictor::from_config(&config.model);
        let providers: Arc<dyn ProviderSource> = Arc::new(NpiRegistryClient::new(&config.providers)?);
        let assistant = DocAssistant::from_config(&config.docchat);
        Self::new(config, predictor, providers, assistant)
    }
}

pub type SharedState = Arc<AppState>;
