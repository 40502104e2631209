//! Autonomy CLI abstraction — enables test doubles for all `autonomy`
//! commands.
//!
//! Every unit of real work in a deployment (package locking, registry
//! pushes, image building, key generation, deployment orchestration) is
//! delegated to the external `autonomy` binary. The only signal observed
//! here is each command's exit status and captured output; everything the
//! tool does internally is opaque.

use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::command_runner::{BUILD_TIMEOUT, CommandRunner, EnvVars, TokioCommandRunner};

/// Binary name of the external deployment toolchain.
pub const AUTONOMY_BIN: &str = "autonomy";

/// Abstraction over the autonomy CLI, enabling test doubles.
///
/// `dir` is the working directory of the spawned command: the project root
/// for package operations, the fetched service directory for everything
/// after `fetch`.
#[allow(async_fn_in_trait)]
pub trait Autonomy {
    /// Run `autonomy packages lock` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or times out.
    async fn packages_lock(&self, dir: &Path) -> Result<Output>;

    /// Run `autonomy push-all` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or times out.
    async fn push_all(&self, dir: &Path) -> Result<Output>;

    /// Run `autonomy fetch <service> --service --alias <alias>` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or times out.
    async fn fetch(&self, dir: &Path, service: &str, alias: &str) -> Result<Output>;

    /// Run `autonomy build-image` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or times out.
    async fn build_image(&self, dir: &Path) -> Result<Output>;

    /// Run `autonomy generate-key <ledger> -n <count>` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or times out.
    async fn generate_keys(&self, dir: &Path, ledger: &str, count: u32) -> Result<Output>;

    /// Run `autonomy deploy build <keys_file> -ltm` in `dir` with the
    /// given extra environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or times out.
    async fn deploy_build(
        &self,
        dir: &Path,
        keys_file: &str,
        envs: EnvVars<'_>,
    ) -> Result<Output>;

    /// Run `autonomy deploy run --build-dir <build_dir>` in `dir` with the
    /// given extra environment. Stdio is inherited and no timeout applies;
    /// the deployment runs until it exits or the user interrupts it.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned.
    async fn deploy_run(
        &self,
        dir: &Path,
        build_dir: &str,
        envs: EnvVars<'_>,
    ) -> Result<ExitStatus>;
}

/// Production implementation — shells out to the `autonomy` binary.
pub struct AutonomyCli {
    runner: TokioCommandRunner,
}

impl AutonomyCli {
    /// Create a production autonomy wrapper with default timeouts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runner: TokioCommandRunner::default(),
        }
    }
}

impl Default for AutonomyCli {
    fn default() -> Self {
        Self::new()
    }
}

impl Autonomy for AutonomyCli {
    async fn packages_lock(&self, dir: &Path) -> Result<Output> {
        self.runner
            .run(AUTONOMY_BIN, &["packages", "lock"], dir, &[])
            .await
    }

    async fn push_all(&self, dir: &Path) -> Result<Output> {
        self.runner.run(AUTONOMY_BIN, &["push-all"], dir, &[]).await
    }

    async fn fetch(&self, dir: &Path, service: &str, alias: &str) -> Result<Output> {
        self.runner
            .run(
                AUTONOMY_BIN,
                &["fetch", service, "--service", "--alias", alias],
                dir,
                &[],
            )
            .await
    }

    async fn build_image(&self, dir: &Path) -> Result<Output> {
        self.runner
            .run_with_timeout(AUTONOMY_BIN, &["build-image"], dir, &[], BUILD_TIMEOUT)
            .await
    }

    async fn generate_keys(&self, dir: &Path, ledger: &str, count: u32) -> Result<Output> {
        let count = count.to_string();
        self.runner
            .run(
                AUTONOMY_BIN,
                &["generate-key", ledger, "-n", &count],
                dir,
                &[],
            )
            .await
    }

    async fn deploy_build(
        &self,
        dir: &Path,
        keys_file: &str,
        envs: EnvVars<'_>,
    ) -> Result<Output> {
        self.runner
            .run_with_timeout(
                AUTONOMY_BIN,
                &["deploy", "build", keys_file, "-ltm"],
                dir,
                envs,
                BUILD_TIMEOUT,
            )
            .await
    }

    async fn deploy_run(
        &self,
        dir: &Path,
        build_dir: &str,
        envs: EnvVars<'_>,
    ) -> Result<ExitStatus> {
        self.runner
            .run_status(
                AUTONOMY_BIN,
                &["deploy", "run", "--build-dir", build_dir],
                dir,
                envs,
            )
            .await
    }
}
