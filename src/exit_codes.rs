//! Exit code constants for the cwrap shim.
//!
//! - 0: success
//! - 1: bad arguments or launch/runtime failure
//! - 124: child killed after exceeding the timeout
//!
//! A child process that exits nonzero on its own has that code relayed
//! verbatim, so child codes do not appear here.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Argument error or launch/runtime failure (bad `--timeout` value,
/// missing executable, I/O error).
pub const RUNTIME_ERROR: i32 = 1;

/// Child process killed after exceeding the configured timeout.
/// Matches the code used by coreutils timeout(1).
pub const TIMEOUT: i32 = 124;
