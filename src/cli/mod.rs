//! Argument parsing for the cwrap shim.
//!
//! The wrapper forwards most of its flags straight through to the Claude
//! CLI, so parsing is deliberately non-strict: flags it does not recognize
//! are skipped rather than rejected. This keeps the shim forward compatible
//! when the wrapped CLI grows new flags.

use crate::error::{Result, WrapError};
use std::io::Read;

/// Default timeout for the wrapped CLI, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 600;

/// A single wrapper invocation, parsed from argv.
///
/// Built once per process and discarded after the child exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Model name forwarded via `--model`.
    pub model: Option<String>,
    /// Session to create or continue, forwarded via `--session-id`.
    pub session_id: Option<String>,
    /// Session to resume, forwarded via `--resume`.
    /// Ignored when `session_id` is also set.
    pub resume_id: Option<String>,
    /// Extra system prompt text, forwarded via `--append-system-prompt`.
    pub system_prompt: Option<String>,
    /// Output format forwarded via `--output-format`.
    pub output_format: Option<String>,
    /// Maximum child runtime before it is killed.
    pub timeout_seconds: u64,
    /// The user prompt, from the positional argument or piped stdin.
    pub user_prompt: Option<String>,
    /// Whether to pass `--print` (non-interactive mode).
    pub print_mode: bool,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            model: None,
            session_id: None,
            resume_id: None,
            system_prompt: None,
            output_format: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_prompt: None,
            print_mode: false,
        }
    }
}

/// Parse invocation arguments (excluding the program name) into a `Request`.
///
/// Value flags consume exactly one following token; a value flag appearing
/// as the last token is skipped. The first token without a `--` prefix that
/// was not consumed as a flag value becomes the user prompt. Unknown `--`
/// tokens are skipped.
///
/// # Errors
///
/// Returns a `UserError` when `--timeout` is given a non-integer value.
pub fn parse_args<I>(args: I) -> Result<Request>
where
    I: IntoIterator<Item = String>,
{
    let argv: Vec<String> = args.into_iter().collect();
    let mut request = Request::default();

    let mut i = 0;
    while i < argv.len() {
        let has_value = i + 1 < argv.len();
        match argv[i].as_str() {
            "--model" if has_value => {
                request.model = Some(argv[i + 1].clone());
                i += 2;
            }
            "--session-id" if has_value => {
                request.session_id = Some(argv[i + 1].clone());
                i += 2;
            }
            "--resume" if has_value => {
                request.resume_id = Some(argv[i + 1].clone());
                i += 2;
            }
            "--append-system-prompt" if has_value => {
                request.system_prompt = Some(argv[i + 1].clone());
                i += 2;
            }
            "--output-format" if has_value => {
                request.output_format = Some(argv[i + 1].clone());
                i += 2;
            }
            "--timeout" if has_value => {
                request.timeout_seconds = argv[i + 1].parse().map_err(|_| {
                    WrapError::UserError(format!(
                        "invalid --timeout value '{}': expected a whole number of seconds",
                        argv[i + 1]
                    ))
                })?;
                i += 2;
            }
            "--print" => {
                request.print_mode = true;
                i += 1;
            }
            arg if !arg.starts_with("--") => {
                // First bare token is the user prompt; later ones are ignored.
                if request.user_prompt.is_none() {
                    request.user_prompt = Some(arg.to_string());
                }
                i += 1;
            }
            _ => {
                // Unknown flag, skip it.
                i += 1;
            }
        }
    }

    Ok(request)
}

/// Fill the user prompt from a reader when no positional prompt was given.
///
/// The caller gates this on stdin not being a terminal. Surrounding
/// whitespace is trimmed; all-whitespace input leaves the prompt unset.
pub fn apply_stdin_prompt<R: Read>(request: &mut Request, mut reader: R) -> std::io::Result<()> {
    if request.user_prompt.is_some() {
        return Ok(());
    }

    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        request.user_prompt = Some(trimmed.to_string());
    }
    Ok(())
}
