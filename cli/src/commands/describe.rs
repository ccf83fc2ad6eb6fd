// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Print a composed service descriptor.
//!
//! Composition only; the Docker daemon is never contacted.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use wharf_composer_core::application::Composer;
use wharf_composer_core::domain::component::Component;
use wharf_composer_core::domain::env_config::DevEnvManifest;
use wharf_composer_core::domain::source_tree::SourceTree;

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Args)]
pub struct DescribeCommand {
    /// Component to describe
    #[arg(value_name = "COMPONENT")]
    pub component: String,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,
}

pub fn handle_command(
    command: DescribeCommand,
    config_override: Option<PathBuf>,
    source_override: Option<PathBuf>,
) -> Result<()> {
    let manifest =
        DevEnvManifest::load_or_default(config_override).context("Failed to load configuration")?;
    let spec = manifest.spec;

    let component: Component = command
        .component
        .parse()
        .with_context(|| format!("'{}' is not a platform component", command.component))?;

    let source_root = source_override.unwrap_or_else(|| spec.source_root.clone());
    let composer = Composer::with_spec(SourceTree::new(source_root), spec);
    let service = composer
        .service(component)
        .with_context(|| format!("Failed to compose {component}"))?;

    let rendered = match command.format {
        OutputFormat::Yaml => serde_yaml::to_string(service.descriptor())?,
        OutputFormat::Json => serde_json::to_string_pretty(service.descriptor())?,
    };
    println!("{rendered}");

    Ok(())
}
