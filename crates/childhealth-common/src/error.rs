use thiserror::Error;

use crate::form::FormError;

#[derive(Debug, Error)]
pub enum ChildHealthError {
    #[error("Invalid form input: {0}")]
    Form(#[from] FormError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<toml::de::Error> for ChildHealthError {
    fn from(e: toml::de::Error) -> Self {
        ChildHealthError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChildHealthError>;
