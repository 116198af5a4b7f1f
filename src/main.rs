//! Cwrap: argument-translating launcher shim for the Claude CLI.
//!
//! Exists so callers that cannot spawn the Claude CLI directly (notably a
//! Node.js server hitting its spawn bug) can shell out to this binary
//! instead. It parses wrapper flags into a request, builds the CLI
//! invocation (spilling oversized prompts to a temp file or stdin), runs
//! the CLI under a timeout, and relays its output and exit code.

mod cli;
mod command;
mod error;
mod exit_codes;
mod runner;

use crate::error::{Result, WrapError};
use std::io::{self, IsTerminal};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

/// Parse, build, and run: the whole program is one pass through these
/// three stages.
fn run() -> Result<u8> {
    let mut request = cli::parse_args(std::env::args().skip(1))?;

    // No positional prompt: fall back to piped stdin.
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        cli::apply_stdin_prompt(&mut request, stdin.lock())
            .map_err(|e| WrapError::RuntimeError(format!("failed to read stdin: {}", e)))?;
    }

    let claude_path = command::resolve_claude_path();
    let timeout_seconds = request.timeout_seconds;
    let (args, piped_input) = command::build(&request)?;

    let result = runner::run(&claude_path, &args, piped_input, timeout_seconds)?;
    if result.timed_out {
        return Err(WrapError::Timeout {
            seconds: timeout_seconds,
        });
    }

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    runner::relay(&result, &mut stdout, &mut stderr)
}
