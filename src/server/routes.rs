//! HTTP route handlers for the sleep assistant API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::assistant::core::errors::{AssistantError, GENERIC_FAILURE_NOTICE};
use crate::assistant::core::route::Route;
use crate::assistant::core::snippet::RetrievedSnippet;
use crate::assistant::state::conversation::{ChatMessage, ConversationState};
use crate::assistant::state::session_store::SessionId;
use crate::assistant::validation::validator::Validation;

use super::state::AppState;

/// Route label reported when input validation rejects a message.
pub const VALIDATION_ROUTE: &str = "validation";

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat))
        .route("/chat/{session_id}", get(get_session).delete(reset_session))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "sleep-assistant",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Chat request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Session to continue; a new one is started when absent.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// A role/content pair as rendered to clients.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagePayload {
    /// `user` or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl From<&ChatMessage> for MessagePayload {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }
    }
}

/// Chat response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Session identifier to send with the next turn.
    pub session_id: String,
    /// Assistant reply or validation guidance.
    pub reply: String,
    /// `general`, `sleep`, or `validation`.
    pub route: String,
    /// Full message log after the turn.
    pub messages: Vec<MessagePayload>,
    /// Snippets the reply was grounded on.
    pub sources: Vec<RetrievedSnippet>,
}

/// Error body for failed requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Session the request referred to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// User-facing error text.
    pub error: String,
}

/// Session snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session identifier.
    pub session_id: String,
    /// Full message log.
    pub messages: Vec<MessagePayload>,
    /// Route of the most recent turn.
    pub last_route: Option<Route>,
    /// Snippets used for the most recent reply.
    pub sources: Vec<RetrievedSnippet>,
    /// User utterances in the history window.
    pub user_turns: usize,
}

fn render_messages(state: &ConversationState) -> Vec<MessagePayload> {
    state.messages().iter().map(MessagePayload::from).collect()
}

/// Process one chat turn.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let session_id = SessionId::from_client(request.session_id.as_deref());

    let message = match state.validator.validate(&request.message) {
        Validation::Accepted(message) => message,
        Validation::Rejected(rejection) => {
            info!("Rejected message for session {}: {:?}", session_id, rejection);
            let messages = match state.sessions.get(&session_id).await {
                Some(handle) => render_messages(&*handle.lock().await),
                None => Vec::new(),
            };
            return Ok(Json(ChatResponse {
                session_id: session_id.to_string(),
                reply: rejection.guidance().to_string(),
                route: VALIDATION_ROUTE.to_string(),
                messages,
                sources: Vec::new(),
            }));
        }
    };

    let handle = state.sessions.get_or_create(&session_id).await;
    let mut conversation = handle.lock().await;
    match state
        .orchestrator
        .process_turn(&conversation, &message)
        .await
    {
        Ok(outcome) => {
            *conversation = outcome.state;
            info!("Session {} used route '{}'", session_id, outcome.route);
            Ok(Json(ChatResponse {
                session_id: session_id.to_string(),
                reply: outcome.reply,
                route: outcome.route.to_string(),
                messages: render_messages(&conversation),
                sources: outcome.snippets,
            }))
        }
        Err(err) => {
            let status = failure_status(&err);
            if err.is_collaborator_failure() {
                warn!("Collaborator failed for session {}: {}", session_id, err);
            } else {
                error!("Turn failed for session {}: {}", session_id, err);
            }
            Err((
                status,
                Json(ErrorResponse {
                    session_id: Some(session_id.to_string()),
                    error: GENERIC_FAILURE_NOTICE.to_string(),
                }),
            ))
        }
    }
}

/// Upstream model or index failures map to 503; anything else is a 500.
fn failure_status(err: &AssistantError) -> StatusCode {
    if err.is_collaborator_failure() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Return the current state of a session.
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, (StatusCode, Json<ErrorResponse>)> {
    let id = SessionId::from_client(Some(&session_id));
    let Some(handle) = state.sessions.get(&id).await else {
        return Err(not_found(id));
    };
    let conversation = handle.lock().await;
    Ok(Json(SessionSnapshot {
        session_id: id.to_string(),
        messages: render_messages(&conversation),
        last_route: conversation.last_route(),
        sources: conversation.last_retrievals().to_vec(),
        user_turns: conversation.user_turns(),
    }))
}

/// Forget a session.
async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let id = SessionId::from_client(Some(&session_id));
    if state.sessions.remove(&id).await {
        info!("Session {} reset", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

fn not_found(id: SessionId) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            session_id: Some(id.to_string()),
            error: "session not found".to_string(),
        }),
    )
}
