//! Per-session conversation state and the bounded session store.

pub mod conversation;
pub mod session_store;

pub use conversation::{ChatMessage, ChatRole, ConversationState, TurnDelta, UserHistory};
pub use session_store::{SessionHandle, SessionId, SessionStore};
