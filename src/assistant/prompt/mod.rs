//! Prompt rendering for the grounded and general branches.

pub mod context_block;
pub mod templates;

pub use context_block::{NO_PRIOR_CONVERSATION, build_context_block, render_conversation_window};
pub use templates::{
    GENERAL_PREAMBLE, SLEEP_PREAMBLE, build_general_prompt, build_grounded_prompt,
};
