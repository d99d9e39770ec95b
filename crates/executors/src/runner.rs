use std::path::PathBuf;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;

/// One external process launch: command, argument vector, working directory.
///
/// Built once per request and never reused. Arguments are always passed as a
/// vector; nothing here goes through a shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl Invocation {
    pub fn new(
        command: impl Into<String>,
        args: Vec<String>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            command: command.into(),
            args,
            working_dir: working_dir.into(),
        }
    }
}

/// Terminal outcome of one invocation.
///
/// `output` holds both stdout and stderr, interleaved in the order chunks
/// were delivered. `exit_code` is `None` when the process never started or
/// was killed by a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub success: bool,
    pub output: String,
    pub exit_code: Option<i32>,
}

#[derive(Debug, Error)]
enum RunnerError {
    #[error("failed to spawn command '{command}': {error}")]
    SpawnFailed {
        command: String,
        error: std::io::Error,
    },
    #[error("failed to wait for command '{command}': {error}")]
    WaitFailed {
        command: String,
        error: std::io::Error,
    },
}

pub struct ProcessRunner;

impl ProcessRunner {
    /// Run the invocation to completion and report its outcome.
    ///
    /// Every failure kind folds into a failure `RunResult` here; callers
    /// always get exactly one result and never an error. A spawn failure
    /// carries the error text as the output, with no exit code. There is no
    /// timeout and no cancellation; the caller awaits process exit.
    pub async fn run(invocation: Invocation) -> RunResult {
        match Self::run_inner(&invocation).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!("{err}");
                RunResult {
                    success: false,
                    output: err.to_string(),
                    exit_code: None,
                }
            }
        }
    }

    async fn run_inner(invocation: &Invocation) -> Result<RunResult, RunnerError> {
        let mut child = Command::new(&invocation.command)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .kill_on_drop(true)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| RunnerError::SpawnFailed {
                command: invocation.command.clone(),
                error,
            })?;

        tracing::debug!(command = %invocation.command, "spawned process");

        let (tx, mut rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_chunks(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_chunks(stderr, tx.clone()));
        }
        drop(tx);

        // The channel closes only after both reader tasks finish, so the
        // buffer is final before the result is built.
        let mut output = String::new();
        while let Some(chunk) = rx.recv().await {
            output.push_str(&chunk);
        }

        let status = child
            .wait()
            .await
            .map_err(|error| RunnerError::WaitFailed {
                command: invocation.command.clone(),
                error,
            })?;
        let exit_code = status.code();
        tracing::debug!(command = %invocation.command, code = ?exit_code, "process exited");

        Ok(RunResult {
            // Signal-killed processes have no code and count as failure.
            success: exit_code == Some(0),
            output,
            exit_code,
        })
    }
}

/// Forward raw chunks from one stream into the shared output channel,
/// preserving arrival order within the stream.
async fn forward_chunks(mut reader: impl AsyncRead + Unpin, tx: mpsc::UnboundedSender<String>) {
    let mut buf = [0u8; 8192];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                if tx.send(chunk).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(command: &str, args: &[&str]) -> Invocation {
        Invocation::new(command, args.iter().map(|s| s.to_string()).collect(), ".")
    }

    #[tokio::test]
    async fn zero_exit_is_success() {
        let result = ProcessRunner::run(invocation("true", &[])).await;
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.output, "");
    }

    #[tokio::test]
    async fn nonzero_exit_carries_the_code() {
        let result = ProcessRunner::run(invocation("false", &[])).await;
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(1));
    }

    #[tokio::test]
    async fn unstartable_command_reports_the_spawn_error() {
        let result = ProcessRunner::run(invocation("nonexistent-binary-xyz", &[])).await;
        assert!(!result.success);
        assert_eq!(result.exit_code, None);
        assert!(result.output.contains("nonexistent-binary-xyz"));
    }

    #[tokio::test]
    async fn missing_working_directory_fails_to_start() {
        let mut inv = invocation("true", &[]);
        inv.working_dir = PathBuf::from("/nonexistent-dir-xyz");
        let result = ProcessRunner::run(inv).await;
        assert!(!result.success);
        assert_eq!(result.exit_code, None);
    }

    #[tokio::test]
    async fn signal_termination_yields_no_code() {
        let result = ProcessRunner::run(invocation("sh", &["-c", "kill -9 $$"])).await;
        assert!(!result.success);
        assert_eq!(result.exit_code, None);
    }

    #[tokio::test]
    async fn stdout_is_captured_without_trailing_noise() {
        let result = ProcessRunner::run(invocation("sh", &["-c", "printf line1"])).await;
        assert!(result.success);
        assert_eq!(result.output, "line1");
    }

    #[tokio::test]
    async fn stderr_is_captured_too() {
        let result = ProcessRunner::run(invocation("sh", &["-c", "printf oops >&2; exit 3"])).await;
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.output, "oops");
    }

    #[tokio::test]
    async fn chunks_are_appended_in_delivery_order() {
        // "A" lands on stdout well before "B" lands on stderr.
        let result = ProcessRunner::run(invocation(
            "sh",
            &["-c", "printf A; sleep 0.3; printf B >&2"],
        ))
        .await;
        assert!(result.success);
        let a = result.output.find('A');
        let b = result.output.find('B');
        assert!(a.is_some() && b.is_some());
        assert!(a < b);
    }

    #[tokio::test]
    async fn runs_in_the_given_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let inv = Invocation::new("pwd", vec![], dir.path());
        let result = ProcessRunner::run(inv).await;
        assert!(result.success);
        let reported = PathBuf::from(result.output.trim());
        assert_eq!(
            reported.file_name(),
            dir.path().canonicalize().unwrap().file_name()
        );
    }
}
