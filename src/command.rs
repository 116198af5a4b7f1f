//! Claude CLI command construction.
//!
//! Maps a parsed `Request` onto the argument vector the Claude CLI expects,
//! spilling oversized prompts out of the command line: a large system prompt
//! goes to a temp file referenced with the `@<path>` convention, and a large
//! user prompt is returned as a payload for the child's stdin.

use crate::cli::Request;
use crate::error::{Result, WrapError};
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::Builder;

/// Fallback executable path when `CLAUDE_PATH` is not set.
pub const DEFAULT_CLAUDE_PATH: &str = "/usr/local/bin/claude";

/// Character threshold for passing a prompt on the command line.
///
/// A system prompt exceeding this goes to a temp file; a user prompt must
/// be strictly under it to ride as a positional argument.
pub const INLINE_PROMPT_LIMIT: usize = 5000;

/// Resolve the Claude CLI executable path from the environment.
///
/// Called once at startup; the result is passed down explicitly.
pub fn resolve_claude_path() -> PathBuf {
    resolve_claude_path_from(env::var_os("CLAUDE_PATH"))
}

fn resolve_claude_path_from(override_path: Option<std::ffi::OsString>) -> PathBuf {
    match override_path {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CLAUDE_PATH),
    }
}

/// Build the Claude CLI argument vector for a request.
///
/// Returns the arguments plus an optional payload for the child's stdin.
/// The payload is present only when the user prompt is too large to pass
/// as a single positional argument.
pub fn build(request: &Request) -> Result<(Vec<String>, Option<String>)> {
    let mut args = Vec::new();

    if request.print_mode {
        args.push("--print".to_string());
    }

    if let Some(ref model) = request.model {
        args.push("--model".to_string());
        args.push(model.clone());
    }

    // Session id and resume are mutually exclusive; session id wins.
    if let Some(ref session_id) = request.session_id {
        args.push("--session-id".to_string());
        args.push(session_id.clone());
    } else if let Some(ref resume_id) = request.resume_id {
        args.push("--resume".to_string());
        args.push(resume_id.clone());
    }

    if let Some(ref format) = request.output_format {
        args.push("--output-format".to_string());
        args.push(format.clone());
    }

    if let Some(ref system_prompt) = request.system_prompt {
        args.push("--append-system-prompt".to_string());
        if system_prompt.chars().count() > INLINE_PROMPT_LIMIT {
            let path = spill_to_temp_file(system_prompt)?;
            args.push(format!("@{}", path.display()));
        } else {
            args.push(system_prompt.clone());
        }
    }

    match &request.user_prompt {
        Some(prompt) if prompt.chars().count() < INLINE_PROMPT_LIMIT => {
            // Small prompts ride along as the final positional argument.
            args.push(prompt.clone());
            Ok((args, None))
        }
        other => Ok((args, other.clone())),
    }
}

/// Write an oversized system prompt to a temp file the Claude CLI reads
/// via `@<path>`.
///
/// The file is kept on disk rather than deleted: the child only opens it
/// after this process has built the command, and the wrapper is too
/// short-lived for the leak to matter.
fn spill_to_temp_file(contents: &str) -> Result<PathBuf> {
    let mut file = Builder::new().suffix(".txt").tempfile().map_err(|e| {
        WrapError::RuntimeError(format!("failed to create system prompt file: {}", e))
    })?;

    file.write_all(contents.as_bytes()).map_err(|e| {
        WrapError::RuntimeError(format!("failed to write system prompt file: {}", e))
    })?;

    let (_, path) = file.keep().map_err(|e| {
        WrapError::RuntimeError(format!("failed to keep system prompt file: {}", e))
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn full_request() -> Request {
        Request {
            model: Some("claude-sonnet-4".to_string()),
            session_id: Some("sess-1".to_string()),
            resume_id: None,
            system_prompt: Some("be terse".to_string()),
            output_format: Some("json".to_string()),
            user_prompt: Some("fix the bug".to_string()),
            print_mode: true,
            ..Request::default()
        }
    }

    #[test]
    fn build_orders_flags_deterministically() {
        let (args, piped) = build(&full_request()).unwrap();
        assert_eq!(
            args,
            vec![
                "--print",
                "--model",
                "claude-sonnet-4",
                "--session-id",
                "sess-1",
                "--output-format",
                "json",
                "--append-system-prompt",
                "be terse",
                "fix the bug",
            ]
        );
        assert_eq!(piped, None);
    }

    #[test]
    fn build_session_id_wins_over_resume() {
        let request = Request {
            session_id: Some("sess-1".to_string()),
            resume_id: Some("old-sess".to_string()),
            ..Request::default()
        };
        let (args, _) = build(&request).unwrap();
        assert!(args.contains(&"--session-id".to_string()));
        assert!(!args.contains(&"--resume".to_string()));
        assert!(!args.contains(&"old-sess".to_string()));
    }

    #[test]
    fn build_resume_used_without_session_id() {
        let request = Request {
            resume_id: Some("old-sess".to_string()),
            ..Request::default()
        };
        let (args, _) = build(&request).unwrap();
        assert_eq!(args, vec!["--resume", "old-sess"]);
    }

    #[test]
    fn build_system_prompt_at_limit_stays_inline() {
        let prompt = "x".repeat(INLINE_PROMPT_LIMIT);
        let request = Request {
            system_prompt: Some(prompt.clone()),
            ..Request::default()
        };
        let (args, _) = build(&request).unwrap();
        assert_eq!(args, vec!["--append-system-prompt".to_string(), prompt]);
    }

    #[test]
    fn build_system_prompt_over_limit_goes_to_file() {
        let prompt = "x".repeat(INLINE_PROMPT_LIMIT + 1);
        let request = Request {
            system_prompt: Some(prompt.clone()),
            ..Request::default()
        };
        let (args, _) = build(&request).unwrap();

        assert_eq!(args[0], "--append-system-prompt");
        let reference = &args[1];
        assert!(reference.starts_with('@'), "expected @<path>, got {}", reference);

        let path = PathBuf::from(&reference[1..]);
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("txt"));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, prompt);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn build_user_prompt_under_limit_is_positional() {
        let prompt = "y".repeat(INLINE_PROMPT_LIMIT - 1);
        let request = Request {
            user_prompt: Some(prompt.clone()),
            ..Request::default()
        };
        let (args, piped) = build(&request).unwrap();
        assert_eq!(args, vec![prompt]);
        assert_eq!(piped, None);
    }

    #[test]
    fn build_user_prompt_at_limit_is_piped() {
        let prompt = "y".repeat(INLINE_PROMPT_LIMIT);
        let request = Request {
            user_prompt: Some(prompt.clone()),
            ..Request::default()
        };
        let (args, piped) = build(&request).unwrap();
        assert!(args.is_empty());
        assert_eq!(piped, Some(prompt));
    }

    #[test]
    fn build_without_user_prompt_has_no_payload() {
        let (args, piped) = build(&Request::default()).unwrap();
        assert!(args.is_empty());
        assert_eq!(piped, None);
    }

    #[test]
    fn resolve_path_prefers_override() {
        let path = resolve_claude_path_from(Some(OsString::from("/opt/claude/bin/claude")));
        assert_eq!(path, PathBuf::from("/opt/claude/bin/claude"));
    }

    #[test]
    fn resolve_path_falls_back_when_unset_or_empty() {
        assert_eq!(
            resolve_claude_path_from(None),
            PathBuf::from(DEFAULT_CLAUDE_PATH)
        );
        assert_eq!(
            resolve_claude_path_from(Some(OsString::new())),
            PathBuf::from(DEFAULT_CLAUDE_PATH)
        );
    }
}
