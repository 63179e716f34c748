//! Sleep assistant core: conversation state, routing, retrieval, composition,
//! and the turn orchestrator, plus the collaborator seams they run on.

pub mod compose;
pub mod core;
pub mod embedding;
pub mod engine;
pub mod llm;
pub mod logging;
pub mod prompt;
pub mod retrieval;
pub mod router;
pub mod state;
pub mod storage;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use compose::{
    CLARIFICATION_REPLY, ComposedReply, EMPTY_GENERATION_REPLY, NO_MATCH_REPLY, ResponseComposer,
};
pub use self::core::{
    AssistantConfig, AssistantError, AssistantResult, GENERIC_FAILURE_NOTICE, RetrievedSnippet,
    Route,
};
pub use engine::{AssistantBackends, TurnOrchestrator, TurnOutcome, TurnStage};
pub use logging::init_tracing;
pub use state::{ChatMessage, ChatRole, ConversationState, SessionId, SessionStore};
pub use validation::{MessageValidator, Rejection, Validation};
