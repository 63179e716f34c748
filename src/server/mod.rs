//! HTTP server for the sleep assistant API.
//!
//! Provides REST endpoints for:
//! - Chat turns scoped to a session
//! - Session inspection and reset

pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Interval between sweeps of expired sessions.
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start the HTTP server with graceful shutdown support.
///
/// The server will stop accepting new connections when `shutdown_signal` completes.
/// A background task drops expired sessions every [`SESSION_SWEEP_INTERVAL`].
///
/// # Errors
/// Returns an error if the listener cannot bind or the server fails.
pub async fn run_server_with_shutdown<F>(
    state: Arc<AppState>,
    addr: SocketAddr,
    shutdown_signal: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let sweeper = spawn_session_sweeper(Arc::clone(&state), SESSION_SWEEP_INTERVAL);

    let app: Router = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Sleep assistant listening on http://{}", listener.local_addr()?);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await;
    sweeper.abort();
    served?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve when the process receives Ctrl+C.
pub async fn ctrl_c_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn spawn_session_sweeper(state: Arc<AppState>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = state.sessions.purge_expired().await;
            if purged > 0 {
                tracing::debug!("Purged {} expired sessions", purged);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::core::config::SessionConfig;
    use crate::assistant::state::session_store::{SessionId, SessionStore};
    use crate::assistant::testing::{FixedEmbedder, ScriptedGenerator, StaticIndex, orchestrator};
    use crate::assistant::validation::validator::MessageValidator;

    fn short_lived_state(ttl: Duration) -> Arc<AppState> {
        AppState::new(
            orchestrator(
                ScriptedGenerator::new(),
                FixedEmbedder::new(vec![1.0]),
                StaticIndex::new(Vec::new()),
            ),
            SessionStore::new(&SessionConfig::default(), 5)
                .unwrap()
                .with_ttl(ttl),
            MessageValidator::new().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_sweeper_drops_idle_sessions() {
        let state = short_lived_state(Duration::from_millis(10));
        state
            .sessions
            .get_or_create(&SessionId::from_client(Some("night-owl")))
            .await;
        assert_eq!(state.sessions.len().await, 1);

        let sweeper = spawn_session_sweeper(Arc::clone(&state), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;
        sweeper.abort();

        assert!(state.sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_sweeper_keeps_live_sessions() {
        let state = short_lived_state(Duration::from_secs(60));
        state
            .sessions
            .get_or_create(&SessionId::from_client(Some("early-bird")))
            .await;

        let sweeper = spawn_session_sweeper(Arc::clone(&state), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(80)).await;
        sweeper.abort();

        assert_eq!(state.sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_server_stops_on_shutdown_signal() {
        let state = short_lived_state(Duration::from_secs(60));
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let result = run_server_with_shutdown(state, addr, async {}).await;
        assert!(result.is_ok());
    }
}
