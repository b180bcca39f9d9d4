//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;

use crate::commands;
use sharables::output::OutputConfig;

/// Sharables - Deploy sections of a shared git repository into projects
#[derive(Parser, Debug)]
#[command(name = "sharables")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Deploy sections to their configured targets
    Deploy(commands::deploy::DeployArgs),

    /// Remove deployed sections from their targets
    Undeploy(commands::undeploy::UndeployArgs),

    /// Create an example .sharables-deploy.yaml
    Config(commands::config::ConfigArgs),

    /// Show the git status of the sharables repository
    Status(commands::status::StatusArgs),

    /// Commit changes in the sharables repository
    Commit(commands::commit::CommitArgs),

    /// Push the sharables repository to its remote
    Push(commands::push::PushArgs),

    /// Commit and push in one step
    Sync(commands::sync::SyncArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let _ = env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .format_timestamp(None)
            .try_init();

        let out = OutputConfig::from_env_and_flag(&self.color);
        debug!("color output: {}", out.use_color);

        match self.command {
            Commands::Deploy(args) => commands::deploy::execute(args, &out),
            Commands::Undeploy(args) => commands::undeploy::execute(args, &out),
            Commands::Config(args) => commands::config::execute(args, &out),
            Commands::Status(args) => commands::status::execute(args, &out),
            Commands::Commit(args) => commands::commit::execute(args, &out),
            Commands::Push(args) => commands::push::execute(args, &out),
            Commands::Sync(args) => commands::sync::execute(args, &out),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
