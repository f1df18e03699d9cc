//! Configuration loading for ChildHealth.
//! Reads childhealth.toml from the current directory or the path in CHILDHEALTH_CONFIG.
//! Every field has a default, so a missing file still yields a runnable config.

use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub docchat: DocChatConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// Sessions untouched for this long are dropped.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
    /// Upper bound on live sessions; the least recently used goes first.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_bind()              -> String  { "0.0.0.0:8050".to_string() }
fn default_static_dir()        -> PathBuf { PathBuf::from("static") }
fn default_session_idle_secs() -> u64     { 3600 }
fn default_max_sessions()      -> usize   { 10_000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: default_static_dir(),
            session_idle_secs: default_session_idle_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

/// Locations of the frozen classifier and its fitted scaler.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_weights_path")]
    pub weights_path: PathBuf,
    #[serde(default = "default_meta_path")]
    pub meta_path: PathBuf,
    #[serde(default = "default_scaler_path")]
    pub scaler_path: PathBuf,
}

fn default_weights_path() -> PathBuf { PathBuf::from("models/classifier.safetensors") }
fn default_meta_path()    -> PathBuf { PathBuf::from("models/classifier.json") }
fn default_scaler_path()  -> PathBuf { PathBuf::from("models/scaler.json") }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            weights_path: default_weights_path(),
            meta_path: default_meta_path(),
            scaler_path: default_scaler_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_npi_url")]
    pub base_url: String,
    #[serde(default = "default_npi_version")]
    pub api_version: String,
    #[serde(default = "default_provider_limit")]
    pub limit: u32,
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_npi_url()          -> String { "https://npiregistry.cms.hhs.gov/api/".to_string() }
fn default_npi_version()      -> String { "2.1".to_string() }
fn default_provider_limit()   -> u32    { 5 }
fn default_provider_timeout() -> u64    { 10 }

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            base_url: default_npi_url(),
            api_version: default_npi_version(),
            limit: default_provider_limit(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocChatConfig {
    #[serde(default = "default_documents")]
    pub documents: Vec<PathBuf>,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub chunk_overlap: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
    /// Falls back to CHILDHEALTH_GEMINI_API_KEY, then GOOGLE_API_KEY.
    #[serde(default)]
    pub api_key: Option<SecretString>,
}

fn default_documents()   -> Vec<PathBuf> { vec![PathBuf::from("assets/book2.pdf")] }
fn default_chunk_size()  -> usize  { 1000 }
fn default_top_k()       -> usize  { 5 }
fn default_llm_model()   -> String { "gemini-1.5-pro".to_string() }
fn default_temperature() -> f32    { 0.2 }
fn default_llm_timeout() -> u64    { 60 }

impl Default for DocChatConfig {
    fn default() -> Self {
        Self {
            documents: default_documents(),
            chunk_size: default_chunk_size(),
            chunk_overlap: 0,
            top_k: default_top_k(),
            model: default_llm_model(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout(),
            api_key: None,
        }
    }
}

impl DocChatConfig {
    /// Configured key, or the first of the known environment variables that is set.
    pub fn resolve_api_key(&self) -> Option<SecretString> {
        self.api_key.clone().or_else(|| {
            ["CHILDHEALTH_GEMINI_API_KEY", "GOOGLE_API_KEY"]
                .iter()
                .find_map(|var| std::env::var(var).ok())
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from)
        })
    }
}

impl AppConfig {
    /// Load configuration, checking CHILDHEALTH_CONFIG first, then ./childhealth.toml.
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CHILDHEALTH_CONFIG")
            .unwrap_or_else(|_| "childhealth.toml".to_string());

        if !Path::new(&path).exists() {
            tracing::warn!(path = %path, "config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::from_file(Path::new(&path))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
