//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

pub mod completions;
mod init;
mod preview;
pub mod site;
mod up;

/// swc - Static website deployer
///
/// Declares a public S3 bucket configured for website hosting and uploads
/// a local directory into it.
#[derive(Parser, Debug)]
#[command(name = "swc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    /// Project configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "SWC_CONFIG",
        default_value = sw_core::config::DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a project configuration file
    Init(init::InitArgs),

    /// Show the resources a deployment would create
    Preview(preview::PreviewArgs),

    /// Create the website resources and upload the files
    Up(up::UpArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Init(args) => init::execute(args, &cli.config, output_config),
        Commands::Preview(args) => preview::execute(args, &cli.config, output_config),
        Commands::Up(args) => up::execute(args, &cli.config, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}
