//! Claude CLI subprocess runner.
//!
//! Spawns the CLI with a timeout, captures stdout/stderr fully, and relays
//! the child's streams and exit code back to the caller.

use crate::error::{Result, WrapError};
use crate::exit_codes;
use std::env;
use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Result of running the Claude CLI once.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Exit code of the process (None if killed or didn't exit normally).
    pub exit_code: Option<i32>,
    /// Captured stdout.
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
    /// Duration of execution.
    pub duration: Duration,
    /// Whether the process was killed due to timeout.
    pub timed_out: bool,
}

impl RunResult {
    /// Check if the child ran to completion successfully.
    pub fn is_success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Run the Claude CLI and capture its output.
///
/// The executable's directory is prepended to the child's `PATH` so the
/// CLI can find helper binaries installed next to it. When `piped_input`
/// is set it is written to the child's stdin, which is then closed;
/// otherwise the child gets no stdin.
///
/// # Errors
///
/// Returns a `RuntimeError` when the executable cannot be spawned
/// (missing, permission denied) or process status cannot be read.
pub fn run(
    program: &Path,
    args: &[String],
    piped_input: Option<String>,
    timeout_seconds: u64,
) -> Result<RunResult> {
    let mut command = Command::new(program);
    command
        .args(args)
        .env("PATH", path_with_program_dir(program))
        .stdin(if piped_input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let start_time = Instant::now();
    let mut child = command.spawn().map_err(|e| {
        WrapError::RuntimeError(format!(
            "failed to execute '{}': {}",
            program.display(),
            e
        ))
    })?;

    // Feed stdin from a separate thread so a large prompt cannot deadlock
    // against the child filling its output pipes.
    if let Some(input) = piped_input {
        if let Some(mut stdin) = child.stdin.take() {
            thread::spawn(move || {
                let _ = stdin.write_all(input.as_bytes());
            });
        }
    }

    let stdout_reader = spawn_capture(child.stdout.take());
    let stderr_reader = spawn_capture(child.stderr.take());

    let timeout = Duration::from_secs(timeout_seconds);
    let (exit_code, timed_out) = wait_with_timeout(&mut child, timeout)?;
    let duration = start_time.elapsed();

    // Killing the child closes its pipes, so the readers finish either way.
    Ok(RunResult {
        exit_code,
        stdout: join_capture(stdout_reader),
        stderr: join_capture(stderr_reader),
        duration,
        timed_out,
    })
}

/// Relay the child's captured streams, returning the exit code to use.
///
/// On success the child's stdout goes to `out`; on failure its stderr goes
/// to `err` and the child's own exit code is propagated. A child that died
/// without an exit code (signal) is reported as a runtime failure.
pub fn relay<W: Write, E: Write>(result: &RunResult, out: &mut W, err: &mut E) -> Result<u8> {
    let code = result.exit_code.unwrap_or(exit_codes::RUNTIME_ERROR);
    if code == exit_codes::SUCCESS {
        out.write_all(result.stdout.as_bytes())
            .map_err(|e| WrapError::RuntimeError(format!("failed to relay stdout: {}", e)))?;
        Ok(exit_codes::SUCCESS as u8)
    } else {
        err.write_all(result.stderr.as_bytes())
            .map_err(|e| WrapError::RuntimeError(format!("failed to relay stderr: {}", e)))?;
        Ok(u8::try_from(code).unwrap_or(exit_codes::RUNTIME_ERROR as u8))
    }
}

/// Build a `PATH` value with the program's directory prepended.
fn path_with_program_dir(program: &Path) -> OsString {
    let existing = env::var_os("PATH").unwrap_or_default();
    let Some(dir) = program.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return existing;
    };

    let mut paths = vec![dir.to_path_buf()];
    paths.extend(env::split_paths(&existing));
    env::join_paths(paths).unwrap_or(existing)
}

/// Drain a child stream to a string on a background thread.
fn spawn_capture<R: Read + Send + 'static>(stream: Option<R>) -> Option<JoinHandle<String>> {
    stream.map(|mut stream| {
        thread::spawn(move || {
            let mut buffer = String::new();
            let _ = stream.read_to_string(&mut buffer);
            buffer
        })
    })
}

fn join_capture(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// Wait for a child process with timeout.
///
/// Returns (exit_code, timed_out).
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(Option<i32>, bool)> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(100);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                return Ok((status.code(), false));
            }
            Ok(None) => {
                // Still running
                if start.elapsed() >= timeout {
                    kill_process(child);
                    return Ok((None, true));
                }
                thread::sleep(poll_interval);
            }
            Err(e) => {
                return Err(WrapError::RuntimeError(format!(
                    "failed to check process status: {}",
                    e
                )));
            }
        }
    }
}

/// Kill a process and wait for it to terminate.
fn kill_process(child: &mut Child) {
    // On Unix this is SIGKILL; on Windows it is TerminateProcess.
    let _ = child.kill();
    let _ = child.wait();
}
