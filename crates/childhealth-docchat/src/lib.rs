//! childhealth-docchat: answers parents' questions from reference documents.
//!
//! Start-up runs in the background: load documents → split into chunks →
//! build a lexical index → check the answer backend. Progress is published as
//! an `AssistantStatus` over a watch channel; questions asked before the
//! assistant is ready get an "initializing" reply instead of an answer.

pub mod error;
pub mod status;
pub mod loader;
pub mod chunker;
pub mod index;
pub mod backend;
pub mod assistant;

pub use assistant::{build_system_prompt, AssistantReply, DocAssistant, SYSTEM_PROMPT};
pub use backend::{AnswerBackend, GeminiBackend, LlmError, StaticAnswerBackend};
pub use chunker::{split_text, ChunkerConfig};
pub use error::{DocChatError, Result};
pub use index::{Chunk, LexicalIndex, ScoredChunk};
pub use loader::{load_documents, SourcePage};
pub use status::{AssistantStatus, LoadingStage};
