//! Error types for the cwrap shim.
//!
//! Uses thiserror for derive macros. Each variant maps to a fixed exit
//! code; child-process failures are not errors here because the child's
//! own exit code is relayed instead.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for wrapper operations.
#[derive(Error, Debug)]
pub enum WrapError {
    /// User provided invalid arguments (e.g. a non-numeric `--timeout`).
    #[error("{0}")]
    UserError(String),

    /// The child process did not finish within the configured timeout.
    #[error("command timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Launch or I/O failure while running the Claude CLI.
    #[error("{0}")]
    RuntimeError(String),
}

impl WrapError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            WrapError::UserError(_) => exit_codes::RUNTIME_ERROR,
            WrapError::Timeout { .. } => exit_codes::TIMEOUT,
            WrapError::RuntimeError(_) => exit_codes::RUNTIME_ERROR,
        }
    }
}

/// Result type alias for wrapper operations.
pub type Result<T> = std::result::Result<T, WrapError>;
