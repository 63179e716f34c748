//! Text generation seam and Ollama readiness check.

pub mod generator;
pub mod readiness;

pub use generator::{
    GenerateFuture, GenerationRequest, OllamaGenerator, TextGenerator, ollama_client,
};
pub use readiness::wait_for_ollama;
