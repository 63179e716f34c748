//! Preambles and prompt bodies for the two reply branches.

use crate::assistant::state::conversation::ChatMessage;

/// System preamble for grounded sleep answers.
pub const SLEEP_PREAMBLE: &str = "You are a knowledgeable assistant that answers questions \
about sleep using the provided context. Cite relevant points from the context when possible. \
If the context lacks enough information, say so before offering general guidance.";

/// System preamble for greetings and small talk.
pub const GENERAL_PREAMBLE: &str = "You are a friendly sleep assistant. Reply briefly and politely \
to greetings and small talk, and invite the user to ask about their sleep.";

/// Prompt for a grounded answer.
#[must_use]
pub fn build_grounded_prompt(context: &str, window: &str, question: &str) -> String {
    let mut out = String::with_capacity(context.len() + window.len() + question.len() + 96);
    out.push_str("Context:\n");
    out.push_str(context);
    out.push_str("\n\nRecent conversation:\n");
    out.push_str(window);
    out.push_str("\n\nQuestion:\n");
    out.push_str(question);
    out.push_str("\n\nCompose a helpful answer:");
    out
}

/// Transcript of the full message sequence, ending with an assistant cue.
#[must_use]
pub fn build_general_prompt(messages: &[ChatMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        out.push_str(message.role.speaker());
        out.push_str(": ");
        out.push_str(&message.content);
        out.push('\n');
    }
    out.push_str("Assistant:");
    out
}
