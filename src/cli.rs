//! Interactive terminal loop.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::error;

use crate::assistant::core::errors::GENERIC_FAILURE_NOTICE;
use crate::assistant::core::snippet::RetrievedSnippet;
use crate::assistant::engine::orchestrator::TurnOrchestrator;
use crate::assistant::state::conversation::ConversationState;
use crate::assistant::validation::validator::{MessageValidator, Validation};

/// Greeting printed when the loop starts.
pub const GREETING: &str = "Sleep Assistant ready! Type your message (or 'exit' to quit).";
/// Farewell printed when the loop ends.
pub const FAREWELL: &str = "Goodbye!";
const PROMPT: &str = "You: ";

fn is_exit_command(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "exit" | "quit")
}

fn format_sources(snippets: &[RetrievedSnippet]) -> String {
    let mut out = String::new();
    let mut number = 0;
    for snippet in snippets {
        if let Some(label) = snippet.citation_label() {
            number += 1;
            out.push_str(&format!("  {number}. {label}\n"));
        }
    }
    if out.is_empty() {
        out
    } else {
        format!("Sources:\n{out}")
    }
}

/// Run the chat loop until `exit`, `quit`, or end of input.
///
/// The conversation lives only for the duration of the loop.
///
/// # Errors
/// Returns an error if reading input or writing output fails.
pub async fn run_chat_loop<R, W>(
    orchestrator: &TurnOrchestrator,
    validator: &MessageValidator,
    history_window: usize,
    mut input: R,
    output: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut state = ConversationState::new(history_window);
    output.write_all(format!("{GREETING}\n").as_bytes()).await?;

    let mut line = String::new();
    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        line.clear();
        if input.read_line(&mut line).await? == 0 || is_exit_command(&line) {
            break;
        }

        let message = match validator.validate(&line) {
            Validation::Accepted(message) => message,
            Validation::Rejected(rejection) => {
                output
                    .write_all(format!("Bot: {}\n", rejection.guidance()).as_bytes())
                    .await?;
                continue;
            }
        };

        match orchestrator.process_turn(&state, &message).await {
            Ok(outcome) => {
                state = outcome.state;
                output
                    .write_all(format!("Bot: {}\n", outcome.reply).as_bytes())
                    .await?;
                output
                    .write_all(format_sources(&outcome.snippets).as_bytes())
                    .await?;
            }
            Err(err) => {
                error!("Turn failed: {}", err);
                output
                    .write_all(format!("Bot: {GENERIC_FAILURE_NOTICE}\n").as_bytes())
                    .await?;
            }
        }
    }

    output.write_all(format!("{FAREWELL}\n").as_bytes()).await?;
    output.flush().await
}

/// Run the chat loop on the process's standard streams.
///
/// # Errors
/// Returns an error if the terminal cannot be read or written.
pub async fn run_stdio(
    orchestrator: &TurnOrchestrator,
    validator: &MessageValidator,
    history_window: usize,
) -> std::io::Result<()> {
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    run_chat_loop(orchestrator, validator, history_window, input, &mut output).await
}
