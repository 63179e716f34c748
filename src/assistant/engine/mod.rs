//! Turn orchestration.

pub mod orchestrator;

pub use orchestrator::{AssistantBackends, TurnOrchestrator, TurnOutcome, TurnStage};
