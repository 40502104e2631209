//! `convoy deploy` — build and run a service deployment.

use anyhow::{Context, Result};
use clap::Args;

use crate::autonomy::Autonomy;
use crate::config::{self, ConfigFile, DeployConfig};
use crate::output::OutputContext;
use crate::pipeline;

/// Arguments for the deploy command.
#[derive(Args, Default)]
pub struct DeployArgs {
    /// Service to deploy, e.g. valory/hello_world
    pub service: Option<String>,

    /// Directory to alias the fetched service to
    #[arg(long)]
    pub alias: Option<String>,

    /// Ledger for key generation
    #[arg(long)]
    pub ledger: Option<String>,

    /// Number of participant keys to generate
    #[arg(long)]
    pub participants: Option<u32>,

    /// Keys file written by key generation
    #[arg(long)]
    pub keys_file: Option<String>,

    /// Deployment build directory
    #[arg(long)]
    pub build_dir: Option<String>,

    /// Build the deployment without running it
    #[arg(long)]
    pub build_only: bool,
}

/// Run `convoy deploy`.
///
/// # Errors
///
/// Returns an error if configuration cannot be resolved or any pipeline
/// step fails.
pub async fn run(args: &DeployArgs, autonomy: &impl Autonomy, ctx: &OutputContext) -> Result<()> {
    let workdir = std::env::current_dir().context("determining working directory")?;
    let file = ConfigFile::load(&workdir)?;
    let cfg = resolve_config(args, file)?;
    pipeline::deploy(&cfg, autonomy, ctx, &workdir).await
}

/// Merge CLI arguments over `convoy.yaml` over built-in defaults.
fn resolve_config(args: &DeployArgs, file: ConfigFile) -> Result<DeployConfig> {
    let service = args
        .service
        .clone()
        .or(file.service)
        .context("no service given: pass one (convoy deploy valory/hello_world) or set `service` in convoy.yaml")?;
    let alias = args
        .alias
        .clone()
        .or(file.alias)
        .unwrap_or_else(|| default_alias(&service));
    Ok(DeployConfig {
        service,
        alias,
        ledger: args
            .ledger
            .clone()
            .or(file.ledger)
            .unwrap_or_else(|| config::DEFAULT_LEDGER.to_string()),
        participants: args
            .participants
            .or(file.participants)
            .unwrap_or(config::DEFAULT_PARTICIPANTS),
        keys_file: args
            .keys_file
            .clone()
            .or(file.keys_file)
            .unwrap_or_else(|| config::DEFAULT_KEYS_FILE.to_string()),
        build_dir: args
            .build_dir
            .clone()
            .or(file.build_dir)
            .unwrap_or_else(|| config::DEFAULT_BUILD_DIR.to_string()),
        run_deployment: !args.build_only,
    })
}

/// Default alias: the last path segment of the service id.
fn default_alias(service: &str) -> String {
    service.rsplit('/').next().unwrap_or(service).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_argument_is_required_somewhere() {
        let err = resolve_config(&DeployArgs::default(), ConfigFile::default())
            .expect_err("expected Err");
        assert!(err.to_string().contains("no service given"), "got: {err}");
    }

    #[test]
    fn defaults_match_the_hello_world_flow() {
        let args = DeployArgs {
            service: Some("valory/hello_world".to_string()),
            ..DeployArgs::default()
        };
        let cfg = resolve_config(&args, ConfigFile::default()).expect("valid");
        assert_eq!(cfg.alias, "hello_world");
        assert_eq!(cfg.ledger, "ethereum");
        assert_eq!(cfg.participants, 4);
        assert_eq!(cfg.keys_file, "keys.json");
        assert_eq!(cfg.build_dir, "abci_build");
        assert!(cfg.run_deployment);
    }

    #[test]
    fn cli_arguments_override_config_file() {
        let args = DeployArgs {
            service: Some("valory/counter".to_string()),
            participants: Some(2),
            build_only: true,
            ..DeployArgs::default()
        };
        let file = ConfigFile {
            service: Some("valory/hello_world".to_string()),
            participants: Some(8),
            alias: Some("from_file".to_string()),
            ..ConfigFile::default()
        };
        let cfg = resolve_config(&args, file).expect("valid");
        assert_eq!(cfg.service, "valory/counter");
        assert_eq!(cfg.participants, 2);
        assert_eq!(cfg.alias, "from_file");
        assert!(!cfg.run_deployment);
    }

    #[test]
    fn config_file_fills_in_missing_arguments() {
        let file = ConfigFile {
            service: Some("valory/hello_world".to_string()),
            ledger: Some("solana".to_string()),
            ..ConfigFile::default()
        };
        let cfg = resolve_config(&DeployArgs::default(), file).expect("valid");
        assert_eq!(cfg.service, "valory/hello_world");
        assert_eq!(cfg.ledger, "solana");
    }

    #[test]
    fn alias_defaults_to_last_service_segment() {
        assert_eq!(default_alias("valory/hello_world"), "hello_world");
        assert_eq!(default_alias("hello_world"), "hello_world");
    }
}
