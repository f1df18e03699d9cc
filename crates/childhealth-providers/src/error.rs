//! Error types for provider lookup.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProviderError>;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Registry returned status {0}")]
    Status(u16),

    #[error("Registry rejected the query: {0}")]
    Registry(String),

    #[error("No taxonomy code for condition '{0}'")]
    UnknownCondition(String),
}
