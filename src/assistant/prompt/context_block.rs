//! Rendering of retrieved snippets and recent conversation into prompt text.

use crate::assistant::core::snippet::RetrievedSnippet;
use crate::assistant::state::conversation::{ChatMessage, ChatRole};

/// Placeholder used when no earlier messages exist.
pub const NO_PRIOR_CONVERSATION: &str = "No prior conversation.";

/// Join snippets into one context block, each prefixed by its citation label
/// and separated by a blank line. Order is preserved.
#[must_use]
pub fn build_context_block(snippets: &[RetrievedSnippet]) -> String {
    let mut out = String::new();
    for snippet in snippets {
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        if let Some(label) = snippet.citation_label() {
            out.push_str(&label);
            out.push('\n');
        }
        out.push_str(snippet.text.trim());
    }
    out
}

/// Render the `limit` messages preceding the latest user message as
/// `User: ...` / `Assistant: ...` lines.
#[must_use]
pub fn render_conversation_window(messages: &[ChatMessage], limit: usize) -> String {
    let earlier = match messages.last() {
        Some(last) if last.role == ChatRole::User => &messages[..messages.len() - 1],
        _ => messages,
    };
    let skip = earlier.len().saturating_sub(limit);
    let window = &earlier[skip..];
    if window.is_empty() {
        return NO_PRIOR_CONVERSATION.to_string();
    }

    let mut out = String::new();
    for message in window {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(message.role.speaker());
        out.push_str(": ");
        out.push_str(&message.content);
    }
    out
}
