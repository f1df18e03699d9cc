//! Observable initialisation state of the assistant.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingStage {
    LoadingDocuments,
    SplittingDocuments,
    BuildingIndex,
    InitializingModel,
}

impl LoadingStage {
    pub fn message(self) -> &'static str {
        match self {
            LoadingStage::LoadingDocuments => "Loading documents...",
            LoadingStage::SplittingDocuments => "Splitting documents...",
            LoadingStage::BuildingIndex => "Building search index...",
            LoadingStage::InitializingModel => "Initializing language model...",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum AssistantStatus {
    NotStarted,
    Loading(LoadingStage),
    Ready,
    Failed(String),
}

impl AssistantStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, AssistantStatus::Ready)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AssistantStatus::Failed(_))
    }

    /// Icon shown next to the status line on the chat page.
    pub fn icon(&self) -> &'static str {
        match self {
            AssistantStatus::Ready => "✅",
            AssistantStatus::Failed(_) => "❌",
            AssistantStatus::NotStarted | AssistantStatus::Loading(_) => "⏳",
        }
    }
}

impl std::fmt::Display for AssistantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssistantStatus::NotStarted => f.write_str("Not started"),
            AssistantStatus::Loading(stage) => f.write_str(stage.message()),
            AssistantStatus::Ready => f.write_str("System Ready"),
            AssistantStatus::Failed(reason) => write!(f, "Failed - {reason}"),
        }
    }
}
