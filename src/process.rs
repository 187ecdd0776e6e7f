//! # External Process Execution
//!
//! Single abstraction for spawning external binaries with a hard wall-clock
//! timeout, used uniformly by the engine locator probes, the OCR invoker, and
//! the PDF rasterizer boundary.
//!
//! The timeout is enforced, not advisory: a process that exceeds its budget is
//! forcibly terminated rather than abandoned.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

/// Captured output of a completed process run
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl ProcessOutput {
    /// Stdout decoded lossily as UTF-8
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Failure modes of an external process invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessError {
    /// Binary does not exist at the given path
    NotFound(String),
    /// Process could not be spawned or awaited
    Io(String),
    /// Process exceeded its wall-clock budget and was killed
    TimedOut { timeout: Duration },
    /// Process ran to completion with a nonzero exit status
    NonZeroExit { code: Option<i32>, stderr: String },
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::NotFound(path) => write!(f, "binary not found: {}", path),
            ProcessError::Io(msg) => write!(f, "process I/O failure: {}", msg),
            ProcessError::TimedOut { timeout } => {
                write!(f, "process killed after {}s timeout", timeout.as_secs())
            }
            ProcessError::NonZeroExit { code, stderr } => write!(
                f,
                "process exited with status {}: {}",
                code.map_or_else(|| "unknown".to_string(), |c| c.to_string()),
                stderr.trim()
            ),
        }
    }
}

impl std::error::Error for ProcessError {}

/// Run `program` with `args`, capturing output, bounded by `timeout`.
///
/// Stdin is closed. On timeout the child is killed (`kill_on_drop` tears it
/// down when the wait future is dropped) and `ProcessError::TimedOut` is
/// returned; any partial output is discarded. A nonzero exit status is an
/// error carrying the captured stderr as diagnostic output.
pub async fn invoke_with_timeout<I, S>(
    program: &Path,
    args: I,
    timeout: Duration,
) -> Result<ProcessOutput, ProcessError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(program = %program.display(), timeout_secs = timeout.as_secs(), "spawning external process");

    let child = command.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProcessError::NotFound(program.display().to_string())
        } else {
            ProcessError::Io(e.to_string())
        }
    })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return Err(ProcessError::Io(e.to_string())),
        Err(_) => {
            warn!(
                program = %program.display(),
                timeout_secs = timeout.as_secs(),
                "external process exceeded timeout and was killed"
            );
            return Err(ProcessError::TimedOut { timeout });
        }
    };

    if !output.status.success() {
        return Err(ProcessError::NonZeroExit {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(ProcessOutput {
        stdout: output.stdout,
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sh() -> PathBuf {
        PathBuf::from("/bin/sh")
    }

    #[tokio::test]
    async fn test_captures_stdout_on_success() {
        let output = invoke_with_timeout(&sh(), ["-c", "printf hello"], Duration::from_secs(5))
            .await
            .expect("echo should succeed");
        assert_eq!(output.stdout_text(), "hello");
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let err = invoke_with_timeout(
            &sh(),
            ["-c", "echo broken >&2; exit 3"],
            Duration::from_secs(5),
        )
        .await
        .expect_err("exit 3 should be an error");

        match err {
            ProcessError::NonZeroExit { code, stderr } => {
                assert_eq!(code, Some(3));
                assert!(stderr.contains("broken"));
            }
            other => panic!("expected NonZeroExit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_process_within_grace() {
        let started = std::time::Instant::now();
        let err = invoke_with_timeout(&sh(), ["-c", "sleep 30"], Duration::from_secs(1))
            .await
            .expect_err("sleep should time out");

        assert!(matches!(err, ProcessError::TimedOut { .. }));
        // Hard bound: must return well before the child would have finished.
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_missing_binary_is_not_found() {
        let err = invoke_with_timeout(
            Path::new("/nonexistent/ocr-binary"),
            ["--version"],
            Duration::from_secs(1),
        )
        .await
        .expect_err("missing binary should fail");
        assert!(matches!(err, ProcessError::NotFound(_)));
    }
}
