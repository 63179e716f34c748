//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::assistant::core::config::AssistantConfig;
use crate::assistant::core::errors::AssistantResult;
use crate::assistant::engine::orchestrator::{AssistantBackends, TurnOrchestrator};
use crate::assistant::state::session_store::SessionStore;
use crate::assistant::validation::validator::MessageValidator;

/// Shared application state.
pub struct AppState {
    /// Turn orchestrator.
    pub orchestrator: TurnOrchestrator,
    /// Live sessions.
    pub sessions: SessionStore,
    /// Input validator applied before each turn.
    pub validator: MessageValidator,
}

impl AppState {
    /// Assemble state from already-built parts.
    #[must_use]
    pub fn new(
        orchestrator: TurnOrchestrator,
        sessions: SessionStore,
        validator: MessageValidator,
    ) -> Arc<Self> {
        Arc::new(Self {
            orchestrator,
            sessions,
            validator,
        })
    }

    /// Build state from configuration, connecting to every collaborator.
    ///
    /// # Errors
    /// Returns an error if any collaborator cannot be initialized.
    pub async fn from_config(config: &AssistantConfig) -> AssistantResult<Arc<Self>> {
        let backends = AssistantBackends::from_config(config).await?;
        let orchestrator = TurnOrchestrator::new(backends, config);
        let sessions = SessionStore::new(&config.sessions, config.conversation.history_window)?;
        let validator = MessageValidator::new()?;
        Ok(Self::new(orchestrator, sessions, validator))
    }
}
