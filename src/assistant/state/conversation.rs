//! Conversation state for a single session.
//!
//! The message log is append-only. The user-history window keeps the most
//! recent raw user utterances for building retrieval queries and never grows
//! past its capacity.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assistant::core::config::MAX_USER_HISTORY;
use crate::assistant::core::route::Route;
use crate::assistant::core::snippet::RetrievedSnippet;

/// Role of a conversation message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

impl ChatRole {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Speaker label used when rendering transcripts.
    #[must_use]
    pub const fn speaker(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single role-tagged utterance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who said it.
    pub role: ChatRole,
    /// What was said.
    pub content: String,
    /// When it was recorded.
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Build an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Bounded window of the most recent raw user utterances, oldest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl UserHistory {
    /// Create an empty window. A zero capacity is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert an utterance, evicting the oldest once over capacity.
    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        if entry.is_empty() {
            return;
        }
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Most recent `limit` entries, oldest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<&str> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).map(String::as_str).collect()
    }

    /// Latest entry.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// Iterate entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the window is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Window capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Changes produced by one turn, merged by the orchestrator.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnDelta {
    /// Assistant reply to append.
    pub reply: String,
    /// Route that produced the reply.
    pub route: Route,
    /// Snippets used for the reply; replaces the previous turn's.
    pub snippets: Vec<RetrievedSnippet>,
}

/// Mutable record of one session's conversation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConversationState {
    messages: Vec<ChatMessage>,
    user_history: UserHistory,
    last_route: Option<Route>,
    last_retrievals: Vec<RetrievedSnippet>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new(MAX_USER_HISTORY)
    }
}

impl ConversationState {
    /// Create an empty state with the given history window.
    #[must_use]
    pub fn new(history_window: usize) -> Self {
        Self {
            messages: Vec::new(),
            user_history: UserHistory::new(history_window),
            last_route: None,
            last_retrievals: Vec::new(),
        }
    }

    /// Append a user message and record it in the history window.
    ///
    /// Returns `false` (and changes nothing) when the trimmed text is empty.
    pub fn record_user_message(&mut self, content: &str) -> bool {
        let normalized = content.trim();
        if normalized.is_empty() {
            return false;
        }
        self.messages.push(ChatMessage::user(normalized));
        self.user_history.push(normalized);
        true
    }

    /// Merge a completed turn.
    pub(crate) fn apply(&mut self, delta: TurnDelta) {
        self.messages.push(ChatMessage::assistant(delta.reply));
        self.last_route = Some(delta.route);
        self.last_retrievals = delta.snippets;
    }

    /// Start the conversation over.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.user_history.clear();
        self.last_route = None;
        self.last_retrievals.clear();
    }

    /// Full message log, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Bounded user-history window.
    #[must_use]
    pub const fn user_history(&self) -> &UserHistory {
        &self.user_history
    }

    /// Route chosen on the most recent turn.
    #[must_use]
    pub const fn last_route(&self) -> Option<Route> {
        self.last_route
    }

    /// Snippets used for the most recent reply.
    #[must_use]
    pub fn last_retrievals(&self) -> &[RetrievedSnippet] {
        &self.last_retrievals
    }

    /// Number of user utterances currently in the window.
    #[must_use]
    pub fn user_turns(&self) -> usize {
        self.user_history.len()
    }

    /// Latest user utterance, from the window or else the message log.
    #[must_use]
    pub fn latest_user_utterance(&self) -> Option<&str> {
        self.user_history
            .last()
            .or_else(|| {
                self.messages
                    .iter()
                    .rev()
                    .find(|message| message.role == ChatRole::User)
                    .map(|message| message.content.as_str())
            })
            .filter(|text| !text.trim().is_empty())
    }

    /// Most recent `limit` user utterances, oldest first.
    ///
    /// Falls back to scanning the message log when the window is empty.
    #[must_use]
    pub fn recent_user_utterances(&self, limit: usize) -> Vec<&str> {
        if !self.user_history.is_empty() {
            return self.user_history.recent(limit);
        }
        let mut collected: Vec<&str> = self
            .messages
            .iter()
            .rev()
            .filter(|message| message.role == ChatRole::User)
            .take(limit)
            .map(|message| message.content.as_str())
            .collect();
        collected.reverse();
        collected
    }
}
