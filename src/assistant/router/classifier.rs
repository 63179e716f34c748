//! Route selection for a conversational turn.

use std::sync::Arc;

use tracing::{debug, info};

use crate::assistant::core::errors::AssistantResult;
use crate::assistant::core::route::Route;
use crate::assistant::llm::generator::{GenerationRequest, TextGenerator};
use crate::assistant::router::prompt::ROUTER_PREAMBLE;
use crate::assistant::state::conversation::ConversationState;

/// Chooses the branch for each turn using a low-temperature text model.
#[derive(Clone)]
pub struct MessageRouter {
    generator: Arc<dyn TextGenerator>,
    temperature: f64,
}

impl MessageRouter {
    /// Create a router over the given classifier model.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, temperature: f64) -> Self {
        Self {
            generator,
            temperature,
        }
    }

    /// Pick the route for the latest user utterance in `state`.
    ///
    /// With no user utterance the classifier is not consulted and the route is
    /// [`Route::Sleep`].
    ///
    /// # Errors
    /// Returns an error if the classifier call fails.
    pub async fn route(&self, state: &ConversationState) -> AssistantResult<Route> {
        let Some(latest) = state.latest_user_utterance() else {
            debug!("No user utterance yet; defaulting to sleep route");
            return Ok(Route::Sleep);
        };
        let route = self.classify(latest).await?;
        info!("Router selected '{}' for message: {}", route, latest);
        Ok(route)
    }

    /// Classify a single utterance.
    ///
    /// # Errors
    /// Returns an error if the classifier call fails.
    pub async fn classify(&self, utterance: &str) -> AssistantResult<Route> {
        let request = GenerationRequest::new(ROUTER_PREAMBLE, utterance.trim(), self.temperature);
        let raw = self.generator.generate(request).await?;
        debug!("Classifier output: {:?}", raw);
        Ok(Route::from_classifier_output(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::testing::ScriptedGenerator;

    #[tokio::test]
    async fn test_empty_state_defaults_to_sleep_without_classifier() {
        let generator = ScriptedGenerator::with_replies(["general"]);
        let router = MessageRouter::new(generator.clone(), 0.0);

        let route = router.route(&ConversationState::default()).await.unwrap();
        assert_eq!(route, Route::Sleep);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_classifier_sees_latest_utterance_at_configured_temperature() {
        let generator = ScriptedGenerator::with_replies(["general"]);
        let router = MessageRouter::new(generator.clone(), 0.0);
        let mut state = ConversationState::default();
        state.record_user_message("I can't fall asleep");
        state.record_user_message("Hello!");

        assert_eq!(router.route(&state).await.unwrap(), Route::General);
        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, "Hello!");
        assert_eq!(requests[0].preamble, ROUTER_PREAMBLE);
        assert!(requests[0].temperature.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_health_vocabulary_stays_on_sleep() {
        let generator = ScriptedGenerator::with_replies([
            "sleep",
            "this relates to stress management",
            "Sleep.",
        ]);
        let router = MessageRouter::new(generator, 0.0);
        for message in [
            "How does stress affect my rest?",
            "What routine should I follow before bed?",
            "Does magnesium help with recovery?",
        ] {
            assert_eq!(router.classify(message).await.unwrap(), Route::Sleep);
        }
    }

    #[tokio::test]
    async fn test_classifier_failure_propagates() {
        let generator = ScriptedGenerator::new();
        generator.push_failure();
        let router = MessageRouter::new(generator, 0.0);
        let mut state = ConversationState::default();
        state.record_user_message("hi");
        assert!(router.route(&state).await.is_err());
    }
}
