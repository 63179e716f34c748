//! Core assistant types: configuration, errors, routes, and snippets.

pub mod config;
pub mod errors;
pub mod route;
pub mod snippet;

pub use config::{
    AssistantConfig, ConversationConfig, EmbeddingConfig, IndexBackend, LlmConfig, LoggingConfig,
    MAX_USER_HISTORY, RetrievalConfig, ServerConfig, SessionConfig,
};
pub use errors::{AssistantError, AssistantResult, GENERIC_FAILURE_NOTICE};
pub use route::Route;
pub use snippet::RetrievedSnippet;
