//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Build and launch agent-service deployments
#[derive(Parser)]
#[command(
    name = "convoy",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build and run a service deployment
    Deploy(commands::deploy::DeployArgs),

    /// Render the participant address list from a keys file
    Addresses(commands::addresses::AddressesArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            no_color,
            quiet,
            json,
            command,
        } = self;
        match command {
            Command::Version => {
                commands::version::run(json);
                Ok(())
            }
            Command::Deploy(args) => {
                let ctx = crate::output::OutputContext::new(no_color, quiet);
                let autonomy = crate::autonomy::AutonomyCli::new();
                commands::deploy::run(&args, &autonomy, &ctx).await
            }
            Command::Addresses(args) => commands::addresses::run(&args, json),
        }
    }
}
