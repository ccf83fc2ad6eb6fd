// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Wharf CLI
//!
//! The `wharf` binary composes and runs the development environment of the
//! container-registry platform.
//!
//! ## Commands
//!
//! - `wharf up [COMPONENT…|--all]` - compose and start platform services
//! - `wharf describe <COMPONENT>` - print a service descriptor
//! - `wharf versions` - pinned tool versions and derived URLs
//! - `wharf config show|validate|generate` - configuration management
//!
//! Composition itself never touches the Docker daemon; only `up` does.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;

use commands::{ConfigCommand, DescribeCommand, UpCommand};

/// Wharf - compose the platform dev environment
#[derive(Parser)]
#[command(name = "wharf")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "WHARF_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Platform source checkout (overrides the config manifest)
    #[arg(long, global = true, env = "WHARF_SOURCE_ROOT", value_name = "DIR")]
    source: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "WHARF_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose and start platform services
    #[command(name = "up")]
    Up {
        #[command(flatten)]
        command: UpCommand,
    },

    /// Print a composed service descriptor
    #[command(name = "describe")]
    Describe {
        #[command(flatten)]
        command: DescribeCommand,
    },

    /// Show pinned tool versions and derived URLs
    #[command(name = "versions")]
    Versions,

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Up { command }) => {
            commands::up::handle_command(command, cli.config, cli.source).await
        }
        Some(Commands::Describe { command }) => {
            commands::describe::handle_command(command, cli.config, cli.source)
        }
        Some(Commands::Versions) => commands::versions::handle_command(),
        Some(Commands::Config { command }) => commands::config::handle_command(command, cli.config),
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
