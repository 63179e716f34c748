//! Startup readiness check for the Ollama server.

use std::time::Duration;

use reqwest::Client;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::assistant::core::errors::{AssistantError, AssistantResult};

const PROBE_RETRY: Duration = Duration::from_millis(250);
const PROBE_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Poll `GET /api/version` until Ollama answers or the deadline passes.
///
/// # Errors
/// Returns `AssistantError::Unavailable` if Ollama never answers with success.
pub async fn wait_for_ollama(base_url: &str, timeout: Duration) -> AssistantResult<()> {
    let client = Client::builder()
        .connect_timeout(PROBE_REQUEST_TIMEOUT)
        .timeout(PROBE_REQUEST_TIMEOUT)
        .build()?;
    let url = format!("{}/api/version", base_url.trim_end_matches('/'));
    let deadline = Instant::now() + timeout;

    loop {
        match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Ollama reachable at {}", base_url);
                return Ok(());
            }
            Ok(response) => debug!("Ollama version check returned {}", response.status()),
            Err(err) => debug!("Ollama version check failed: {}", err),
        }

        if Instant::now() + PROBE_RETRY > deadline {
            return Err(AssistantError::Unavailable(format!(
                "ollama at {base_url} did not respond within {}s",
                timeout.as_secs_f32()
            )));
        }
        sleep(PROBE_RETRY).await;
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::routing::get;
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn test_ready_server_passes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/api/version", get(|| async { "{\"version\":\"0.5.0\"}" }));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let result = wait_for_ollama(&format!("http://{addr}"), Duration::from_secs(2)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = wait_for_ollama(&format!("http://{addr}"), Duration::from_millis(300)).await;
        assert!(matches!(result, Err(AssistantError::Unavailable(_))));
    }
}
