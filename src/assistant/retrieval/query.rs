//! Retrieval query construction from the user-history window.

use crate::assistant::state::conversation::ConversationState;

/// Build the retrieval query from the most recent `query_turns` window entries.
///
/// Entries are joined with a single space. Falls back to the latest utterance
/// when the window is empty and returns `None` when there is nothing to search.
#[must_use]
pub fn build_query_text(state: &ConversationState, query_turns: usize) -> Option<String> {
    let recent = state.recent_user_utterances(query_turns.max(1));
    let joined = if recent.is_empty() {
        state.latest_user_utterance()?.to_string()
    } else {
        recent.join(" ")
    };
    let joined = joined.trim().to_string();
    (!joined.is_empty()).then_some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_last_two_utterances() {
        let mut state = ConversationState::default();
        state.record_user_message("I wake up a lot");
        state.record_user_message("usually around 3am");
        state.record_user_message("what can I do?");
        assert_eq!(
            build_query_text(&state, 2).as_deref(),
            Some("usually around 3am what can I do?")
        );
    }

    #[test]
    fn test_single_utterance_is_used_verbatim() {
        let mut state = ConversationState::default();
        state.record_user_message("Why do I wake up at 3am?");
        assert_eq!(
            build_query_text(&state, 2).as_deref(),
            Some("Why do I wake up at 3am?")
        );
    }

    #[test]
    fn test_empty_state_has_no_query() {
        assert!(build_query_text(&ConversationState::default(), 2).is_none());
    }
}
