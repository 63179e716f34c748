//! Binary entrypoint for the interactive sleep assistant.

use std::process::ExitCode;

use sleep_assistant::start_sleep_assistant;

fn main() -> ExitCode {
    start_sleep_assistant::run_cli()
}
