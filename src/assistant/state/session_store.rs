//! In-memory session store with LRU capacity and idle TTL.
//!
//! Each session's state sits behind its own mutex. Adapters hold that lock for
//! the whole turn so turns on one session run one at a time, while different
//! sessions proceed independently. Nothing here survives a restart.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::assistant::core::config::SessionConfig;
use crate::assistant::core::errors::{AssistantError, AssistantResult};
use crate::assistant::state::conversation::ConversationState;

/// Client-visible session identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Use a client-supplied identifier, or generate one when absent or blank.
    #[must_use]
    pub fn from_client(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if !value.is_empty() => Self(value.to_string()),
            _ => Self::generate(),
        }
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared handle to one session's state.
pub type SessionHandle = Arc<Mutex<ConversationState>>;

struct SessionEntry {
    state: SessionHandle,
    last_seen: Instant,
}

impl SessionEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_seen.elapsed() > ttl
    }
}

/// Bounded map from session id to conversation state.
pub struct SessionStore {
    entries: Mutex<LruCache<SessionId, SessionEntry>>,
    ttl: Duration,
    history_window: usize,
}

impl SessionStore {
    /// Create a store.
    ///
    /// # Errors
    /// Returns an error if the capacity is zero.
    pub fn new(config: &SessionConfig, history_window: usize) -> AssistantResult<Self> {
        let capacity = NonZeroUsize::new(config.capacity).ok_or_else(|| {
            AssistantError::InvalidConfig("sessions.capacity must be > 0".to_string())
        })?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl: Duration::from_secs(config.ttl_seconds),
            history_window,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Fetch a live session, creating an empty one if needed.
    pub async fn get_or_create(&self, id: &SessionId) -> SessionHandle {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(id) {
            if !entry.is_expired(self.ttl) {
                entry.last_seen = Instant::now();
                return Arc::clone(&entry.state);
            }
            debug!("Session {} expired; starting fresh", id);
        }

        let state = Arc::new(Mutex::new(ConversationState::new(self.history_window)));
        let evicted = entries.push(
            id.clone(),
            SessionEntry {
                state: Arc::clone(&state),
                last_seen: Instant::now(),
            },
        );
        if let Some((evicted_id, _)) = evicted {
            if &evicted_id != id {
                debug!("Evicted least recently used session {}", evicted_id);
            }
        }
        state
    }

    /// Fetch a live session without creating one.
    pub async fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        let mut entries = self.entries.lock().await;
        let expired = match entries.get_mut(id) {
            None => return None,
            Some(entry) if entry.is_expired(self.ttl) => true,
            Some(entry) => {
                entry.last_seen = Instant::now();
                return Some(Arc::clone(&entry.state));
            }
        };
        if expired {
            entries.pop(id);
        }
        None
    }

    /// Remove a session. Returns whether it existed.
    pub async fn remove(&self, id: &SessionId) -> bool {
        self.entries.lock().await.pop(id).is_some()
    }

    /// Drop every expired session. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let expired: Vec<SessionId> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.ttl))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            entries.pop(id);
        }
        expired.len()
    }

    /// Number of tracked sessions, expired ones included until touched.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether no sessions are tracked.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
