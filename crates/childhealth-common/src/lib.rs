//! childhealth-common: Shared types, errors, and configuration used across all ChildHealth crates.

pub mod error;
pub mod conditions;
pub mod form;
pub mod config;

// Re-export commonly used types
pub use conditions::{Condition, CONDITION_COUNT};
pub use config::AppConfig;
pub use error::{ChildHealthError, Result};
pub use form::{FormAnswers, FormError, FormField, FormSection, FIELD_COUNT};
