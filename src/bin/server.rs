//! Sleep assistant HTTP server.
//! Run with: cargo run --bin sleep-assistant-server -- --port 8001

use std::process::ExitCode;

use clap::Parser;
use sleep_assistant::start_sleep_assistant::{self, ServerOverrides};

#[derive(Parser)]
#[command(name = "sleep-assistant-server")]
#[command(about = "Sleep assistant HTTP API", long_about = None)]
struct Args {
    /// Bind address (defaults to SLEEP_ASSISTANT_HOST or 127.0.0.1).
    #[arg(long)]
    host: Option<String>,
    /// Listen port (defaults to SLEEP_ASSISTANT_PORT or 8001).
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    start_sleep_assistant::run_server(ServerOverrides {
        host: args.host,
        port: args.port,
    })
}
