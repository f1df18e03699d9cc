//! Error types for the document assistant.

use thiserror::Error;

use crate::backend::LlmError;

pub type Result<T> = std::result::Result<T, DocChatError>;

#[derive(Error, Debug)]
pub enum DocChatError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported document type: {0}")]
    Unsupported(String),

    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<lopdf::Error> for DocChatError {
    fn from(e: lopdf::Error) -> Self {
        DocChatError::Pdf(e.to_string())
    }
}
