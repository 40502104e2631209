//! Process execution with timeout and guaranteed kill.

use std::path::Path;
use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

/// Default timeout for autonomy CLI commands (lock, push, fetch, keygen).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout for image and deployment builds, which pull and assemble
/// container layers.
pub const BUILD_TIMEOUT: Duration = Duration::from_secs(1800);

/// Extra environment variables passed to a child process.
pub type EnvVars<'a> = &'a [(&'a str, &'a str)];

/// Generic command execution with timeout and guaranteed process kill.
///
/// This trait is NOT tied to the autonomy binary — it can run any external
/// command. The production implementation uses tokio; test doubles can
/// return canned results without spawning processes.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a command in `dir` with the default timeout.
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
        envs: EnvVars<'_>,
    ) -> Result<Output>;

    /// Run a command in `dir` with a custom timeout (overrides default).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
        envs: EnvVars<'_>,
        timeout: Duration,
    ) -> Result<Output>;

    /// Run a command in `dir` with inherited stdio and no timeout.
    /// Used for long-running foreground commands whose lifetime the user
    /// controls (Ctrl-C).
    async fn run_status(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
        envs: EnvVars<'_>,
    ) -> Result<ExitStatus>;
}

/// Production `CommandRunner` — uses tokio for async process execution
/// with guaranteed timeout and kill on all platforms.
///
/// On Windows, `tokio::time::timeout` around `.output().await` does NOT
/// kill the child when the timeout fires — the future is dropped but the
/// OS process keeps running. `tokio::select!` with an explicit
/// `child.kill()` guarantees termination.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    /// Create a runner with the given default timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
        envs: EnvVars<'_>,
    ) -> Result<Output> {
        self.run_with_timeout(program, args, dir, envs, self.timeout)
            .await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
        envs: EnvVars<'_>,
        timeout: Duration,
    ) -> Result<Output> {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .current_dir(dir)
            .envs(envs.iter().copied())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        // Read stdout/stderr CONCURRENTLY with wait() to avoid pipe
        // deadlock: a child that writes more than the OS pipe buffer
        // blocks on write, and a bare wait() then never resolves.
        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        }
    }

    async fn run_status(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
        envs: EnvVars<'_>,
    ) -> Result<ExitStatus> {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .current_dir(dir)
            .envs(envs.iter().copied())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_exit_status() {
        let runner = TokioCommandRunner::default();
        let out = runner
            .run("sh", &["-c", "printf hello"], Path::new("."), &[])
            .await
            .expect("sh should spawn");
        assert!(out.status.success());
        assert_eq!(out.stdout, b"hello");
    }

    #[tokio::test]
    async fn passes_extra_environment_to_child() {
        let runner = TokioCommandRunner::default();
        let out = runner
            .run(
                "sh",
                &["-c", "printf '%s' \"$CONVOY_TEST_VAR\""],
                Path::new("."),
                &[("CONVOY_TEST_VAR", "from-runner")],
            )
            .await
            .expect("sh should spawn");
        assert_eq!(out.stdout, b"from-runner");
    }

    #[tokio::test]
    async fn runs_in_the_given_directory() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let runner = TokioCommandRunner::default();
        let out = runner
            .run("sh", &["-c", "pwd"], dir.path(), &[])
            .await
            .expect("sh should spawn");
        let cwd = String::from_utf8_lossy(&out.stdout);
        // Compare canonicalized paths — tempdirs may sit behind symlinks.
        let expected = dir.path().canonicalize().expect("canonicalize");
        assert_eq!(Path::new(cwd.trim()), expected);
    }

    #[tokio::test]
    async fn kills_child_on_timeout() {
        let runner = TokioCommandRunner::default();
        let err = runner
            .run_with_timeout(
                "sh",
                &["-c", "sleep 10"],
                Path::new("."),
                &[],
                Duration::from_millis(100),
            )
            .await
            .expect_err("expected timeout");
        assert!(err.to_string().contains("timed out"), "got: {err}");
    }

    #[tokio::test]
    async fn nonzero_exit_is_not_a_spawn_error() {
        let runner = TokioCommandRunner::default();
        let out = runner
            .run("sh", &["-c", "exit 3"], Path::new("."), &[])
            .await
            .expect("sh should spawn");
        assert!(!out.status.success());
        assert_eq!(out.status.code(), Some(3));
    }
}
