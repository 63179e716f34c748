//! Text generation through Rig's Ollama provider.

use std::future::Future;
use std::pin::Pin;

use reqwest::Client as ReqwestClient;
use rig::client::{CompletionClient, Nothing};
use rig::completion::CompletionModel;
use rig::message::AssistantContent;
use rig::providers::ollama;
use tracing::debug;

use crate::assistant::core::config::LlmConfig;
use crate::assistant::core::errors::{AssistantError, AssistantResult};

/// Boxed future type for generator operations.
pub type GenerateFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A single completion request: system preamble, prompt, and sampling temperature.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    /// System instructions.
    pub preamble: String,
    /// User-facing prompt body.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f64,
}

impl GenerationRequest {
    /// Create a request.
    #[must_use]
    pub fn new(preamble: impl Into<String>, prompt: impl Into<String>, temperature: f64) -> Self {
        Self {
            preamble: preamble.into(),
            prompt: prompt.into(),
            temperature,
        }
    }
}

/// Trait abstraction over instruction-following text models.
pub trait TextGenerator: Send + Sync {
    /// Generate a reply.
    ///
    /// # Errors
    /// Returns an error if the model call fails.
    fn generate(&self, request: GenerationRequest) -> GenerateFuture<'_, AssistantResult<String>>;
}

/// Build an Ollama client for the given base URL.
///
/// # Errors
/// Returns an error if the client cannot be built.
pub fn ollama_client(base_url: &str) -> AssistantResult<ollama::Client<ReqwestClient>> {
    ollama::Client::<ReqwestClient>::builder()
        .api_key(Nothing)
        .base_url(base_url)
        .build()
        .map_err(AssistantError::from)
}

/// Ollama-backed generator.
#[derive(Clone)]
pub struct OllamaGenerator {
    model: ollama::CompletionModel,
    max_tokens: Option<u64>,
}

impl OllamaGenerator {
    /// Create a generator from config.
    ///
    /// # Errors
    /// Returns an error if the Ollama client cannot be built.
    pub fn new(config: &LlmConfig) -> AssistantResult<Self> {
        let client = ollama_client(&config.base_url)?;
        Ok(Self {
            model: client.completion_model(config.model.clone()),
            max_tokens: config.max_tokens,
        })
    }
}

impl TextGenerator for OllamaGenerator {
    fn generate(&self, request: GenerationRequest) -> GenerateFuture<'_, AssistantResult<String>> {
        Box::pin(async move {
            debug!(
                "Generating with temperature {} ({} prompt chars)",
                request.temperature,
                request.prompt.len()
            );
            let completion = self
                .model
                .completion_request(request.prompt)
                .preamble(request.preamble)
                .temperature(request.temperature)
                .max_tokens_opt(self.max_tokens)
                .build();
            let response = self.model.completion(completion).await?;
            Ok(extract_text(&response.choice))
        })
    }
}

fn extract_text(choice: &rig::OneOrMany<AssistantContent>) -> String {
    let mut out = String::new();
    for content in choice.iter() {
        if let AssistantContent::Text(text) = content {
            out.push_str(&text.text);
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_builds_from_default_config() {
        assert!(OllamaGenerator::new(&LlmConfig::default()).is_ok());
    }

    #[test]
    fn test_request_new() {
        let request = GenerationRequest::new("be brief", "hello", 0.0);
        assert_eq!(request.preamble, "be brief");
        assert_eq!(request.prompt, "hello");
        assert!(request.temperature.abs() < f64::EPSILON);
    }
}
