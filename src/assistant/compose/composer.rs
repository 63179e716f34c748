//! Reply composition for the general and grounded branches.

use std::sync::Arc;

use tracing::{info, warn};

use crate::assistant::core::errors::AssistantResult;
use crate::assistant::core::route::Route;
use crate::assistant::core::snippet::RetrievedSnippet;
use crate::assistant::llm::generator::{GenerationRequest, TextGenerator};
use crate::assistant::prompt::context_block::{build_context_block, render_conversation_window};
use crate::assistant::prompt::templates::{
    GENERAL_PREAMBLE, SLEEP_PREAMBLE, build_general_prompt, build_grounded_prompt,
};
use crate::assistant::state::conversation::{ChatMessage, ConversationState};

/// Reply used when the knowledge base has nothing relevant.
pub const NO_MATCH_REPLY: &str =
    "I'm not sure. I couldn't find relevant information about that in my sleep knowledge base.";

/// Reply used when there is no user utterance to answer.
pub const CLARIFICATION_REPLY: &str = "I didn't catch that. Could you repeat your question?";

/// Reply used when the model returns no usable text.
pub const EMPTY_GENERATION_REPLY: &str = "I'm not sure how to respond to that.";

/// A reply and the snippets it was grounded on.
#[derive(Clone, Debug, PartialEq)]
pub struct ComposedReply {
    /// Reply text.
    pub reply: String,
    /// Snippets used as provenance; empty when nothing was grounded.
    pub snippets: Vec<RetrievedSnippet>,
}

impl ComposedReply {
    fn ungrounded(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            snippets: Vec::new(),
        }
    }
}

fn or_fallback(generated: String) -> String {
    let trimmed = generated.trim();
    if trimmed.is_empty() {
        warn!("Model returned an empty reply; using fallback");
        EMPTY_GENERATION_REPLY.to_string()
    } else if trimmed.len() == generated.len() {
        generated
    } else {
        trimmed.to_string()
    }
}

/// Produces replies from the generation model.
#[derive(Clone)]
pub struct ResponseComposer {
    generator: Arc<dyn TextGenerator>,
    temperature: f64,
    window_messages: usize,
}

impl ResponseComposer {
    /// Create a composer.
    #[must_use]
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        temperature: f64,
        window_messages: usize,
    ) -> Self {
        Self {
            generator,
            temperature,
            window_messages,
        }
    }

    /// Dispatch to the branch for `route`.
    ///
    /// # Errors
    /// Returns an error if the generation call fails.
    pub async fn compose(
        &self,
        route: Route,
        state: &ConversationState,
        snippets: Vec<RetrievedSnippet>,
    ) -> AssistantResult<ComposedReply> {
        match route {
            Route::General => self.compose_general(state.messages()).await,
            Route::Sleep => {
                let window = render_conversation_window(state.messages(), self.window_messages);
                self.compose_grounded(state.latest_user_utterance(), &window, snippets)
                    .await
            }
        }
    }

    /// Conversational reply over the full message sequence.
    ///
    /// # Errors
    /// Returns an error if the generation call fails.
    pub async fn compose_general(
        &self,
        messages: &[ChatMessage],
    ) -> AssistantResult<ComposedReply> {
        info!("General branch responding to {} messages", messages.len());
        let request = GenerationRequest::new(
            GENERAL_PREAMBLE,
            build_general_prompt(messages),
            self.temperature,
        );
        let reply = self.generator.generate(request).await?;
        Ok(ComposedReply::ungrounded(or_fallback(reply)))
    }

    /// Grounded reply over retrieved snippets.
    ///
    /// No generation happens when the utterance is missing or no snippets were
    /// found; fixed replies are returned instead.
    ///
    /// # Errors
    /// Returns an error if the generation call fails.
    pub async fn compose_grounded(
        &self,
        latest: Option<&str>,
        window: &str,
        snippets: Vec<RetrievedSnippet>,
    ) -> AssistantResult<ComposedReply> {
        let Some(question) = latest.map(str::trim).filter(|text| !text.is_empty()) else {
            return Ok(ComposedReply::ungrounded(CLARIFICATION_REPLY));
        };
        if snippets.is_empty() {
            info!("No relevant knowledge found; returning fallback reply");
            return Ok(ComposedReply::ungrounded(NO_MATCH_REPLY));
        }

        info!("Grounding reply on {} snippets", snippets.len());
        let context = build_context_block(&snippets);
        let request = GenerationRequest::new(
            SLEEP_PREAMBLE,
            build_grounded_prompt(&context, window, question),
            self.temperature,
        );
        let reply = or_fallback(self.generator.generate(request).await?);
        Ok(ComposedReply { reply, snippets })
    }
}
