//! Running external command-line tools under a time budget.
//!
//! Every extraction capability (pdftotext, pdftoppm, tesseract, docsplit) is
//! an external executable. [`run`] spawns one, drains its output on helper
//! threads so a chatty child can never block on a full pipe, and kills it
//! when the budget runs out. The budget also bounds reading the pipes, which
//! a background process started by the tool may keep open after it exits.

use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

/// Interval between exit checks while waiting on a child.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Failure of a single external tool invocation.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{tool} not found (is it installed and on PATH?)")]
    NotFound { tool: String },

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with code {code}: {stderr}")]
    ExitCode {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("{tool} timed out after {}s", .timeout.as_secs())]
    Timeout { tool: String, timeout: Duration },
}

/// Point in time by which all work on one file must be finished.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
        }
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }
}

/// Run `command` to completion, capturing stdout and stderr.
///
/// Stdin is closed. A non-zero exit status is an error carrying the
/// trimmed stderr. A child still running after `timeout` is killed.
pub fn run(command: &mut Command, timeout: Duration) -> Result<Output, ToolError> {
    let tool = tool_name(command.get_program());

    if timeout.is_zero() {
        return Err(ToolError::Timeout { tool, timeout });
    }

    tracing::debug!("Running {:?}", command);

    let deadline = Deadline::after(timeout);
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => ToolError::NotFound { tool: tool.clone() },
            _ => ToolError::Spawn {
                tool: tool.clone(),
                source,
            },
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match wait_with_timeout(&mut child, timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            kill(&mut child);
            return Err(ToolError::Timeout { tool, timeout });
        }
        Err(source) => {
            kill(&mut child);
            return Err(ToolError::Spawn { tool, source });
        }
    };

    let (Some(stdout), Some(stderr)) = (collect(stdout, &deadline), collect(stderr, &deadline))
    else {
        tracing::warn!("{} exited but its output was still held open", tool);
        return Err(ToolError::Timeout { tool, timeout });
    };

    if !status.success() {
        return Err(ToolError::ExitCode {
            tool,
            code: status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        });
    }

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

/// Check whether `program` can be executed.
///
/// Paths are checked directly; bare names are searched for on `PATH`.
pub fn command_exists(program: &Path) -> bool {
    if program.components().count() > 1 {
        return program.is_file();
    }

    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };

    std::env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(program);
        candidate.is_file() || (cfg!(windows) && candidate.with_extension("exe").is_file())
    })
}

/// Display name for a program: its file name without directories.
fn tool_name(program: &OsStr) -> String {
    Path::new(program)
        .file_name()
        .unwrap_or(program)
        .to_string_lossy()
        .into_owned()
}

/// Read a child pipe to the end on a helper thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>> {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf).ok();
            let _ = tx.send(buf);
        });
        rx
    })
}

/// Output of a drained pipe, or `None` if it is not closed by `deadline`.
fn collect(pipe: Option<Receiver<Vec<u8>>>, deadline: &Deadline) -> Option<Vec<u8>> {
    match pipe {
        Some(rx) => rx.recv_timeout(deadline.remaining().max(POLL_INTERVAL)).ok(),
        None => Some(Vec::new()),
    }
}

/// Wait for the child to exit, polling until `timeout` elapses.
///
/// Returns `Ok(None)` when the child is still running at the timeout.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let start = Instant::now();

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
