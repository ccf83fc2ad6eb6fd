// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Compose and start platform services.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use wharf_composer_core::application::Composer;
use wharf_composer_core::domain::component::Component;
use wharf_composer_core::domain::env_config::DevEnvManifest;
use wharf_composer_core::domain::source_tree::SourceTree;
use wharf_composer_core::infrastructure::{DevImageResolver, DockerEngine};

#[derive(Args)]
pub struct UpCommand {
    /// Components to start (see `wharf describe` for the catalog)
    #[arg(value_name = "COMPONENT")]
    pub components: Vec<String>,

    /// Start every platform component
    #[arg(long, conflicts_with = "components")]
    pub all: bool,

    /// Docker socket path (default: auto-detect)
    #[arg(long, value_name = "PATH")]
    pub socket: Option<String>,
}

pub async fn handle_command(
    command: UpCommand,
    config_override: Option<PathBuf>,
    source_override: Option<PathBuf>,
) -> Result<()> {
    let manifest =
        DevEnvManifest::load_or_default(config_override).context("Failed to load configuration")?;
    let spec = manifest.spec.clone();

    let components = selected_components(&command)?;

    let source_root = source_override.unwrap_or_else(|| spec.source_root.clone());
    let composer = Composer::with_spec(SourceTree::new(source_root), spec.clone());

    let resolver = Box::new(DevImageResolver::with_tag(&spec.image_tag));
    let engine = match &command.socket {
        Some(path) => DockerEngine::with_socket(path, resolver),
        None => DockerEngine::new(resolver),
    }
    .context("Failed to connect to Docker")?
    .with_platform(&spec.platform);

    engine
        .healthcheck()
        .await
        .context("Docker daemon is not reachable")?;

    for component in components {
        let service = composer
            .service(component)
            .with_context(|| format!("Failed to compose {component}"))?;
        let id = service
            .start(&engine)
            .await
            .with_context(|| format!("Failed to start {component}"))?;
        println!("{} {} ({})", "✓ started".green(), component.to_string().bold(), id);
    }

    Ok(())
}

fn selected_components(command: &UpCommand) -> Result<Vec<Component>> {
    if command.all {
        return Ok(Component::ALL.to_vec());
    }
    if command.components.is_empty() {
        bail!("no components given; name some or pass --all");
    }
    command
        .components
        .iter()
        .map(|name| {
            name.parse::<Component>()
                .with_context(|| format!("'{name}' is not a platform component"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(components: &[&str], all: bool) -> UpCommand {
        UpCommand {
            components: components.iter().map(|s| s.to_string()).collect(),
            all,
            socket: None,
        }
    }

    #[test]
    fn test_all_selects_the_whole_catalog() {
        let selected = selected_components(&command(&[], true)).unwrap();
        assert_eq!(selected, Component::ALL.to_vec());
    }

    #[test]
    fn test_named_components_are_parsed() {
        let selected = selected_components(&command(&["database", "cache"], false)).unwrap();
        assert_eq!(selected, vec![Component::Database, Component::Cache]);
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        assert!(selected_components(&command(&[], false)).is_err());
    }

    #[test]
    fn test_unknown_component_is_an_error() {
        assert!(selected_components(&command(&["warehouse"], false)).is_err());
    }
}
