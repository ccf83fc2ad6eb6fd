// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Show pinned tool versions and derived URLs.

use anyhow::Result;
use colored::Colorize;

use wharf_composer_core::domain::versions;

pub fn handle_command() -> Result<()> {
    println!("{}", "Toolchain:".bold());
    println!("  go:            {}", versions::GO_VERSION);
    println!("  golangci-lint: {}", versions::GOLANGCI_LINT_VERSION);
    println!("  syft:          {}", versions::SYFT_VERSION);
    println!("  goreleaser:    {}", versions::GORELEASER_VERSION);
    println!();

    println!("{}", "Upstream sources:".bold());
    println!("  registry tag:  {}", versions::REGISTRY_SRC_TAG);
    println!("  distribution:  {}", versions::DISTRIBUTION_SRC);
    println!("  npm registry:  {}", versions::NPM_REGISTRY);
    println!();

    println!("{}", "Scanner:".bold());
    println!("  trivy:         {}", versions::TRIVY_VERSION);
    println!("  adapter:       {}", versions::TRIVY_ADAPTER_VERSION);
    println!("  trivy url:     {}", *versions::TRIVY_DOWNLOAD_URL);
    println!("  adapter url:   {}", *versions::TRIVY_ADAPTER_DOWNLOAD_URL);
    println!();

    println!("{}", "Dev environment:".bold());
    println!("  platform:      {}", versions::DEV_PLATFORM);
    println!("  image tag:     {}", versions::DEV_VERSION);
    println!("  debug:         {}", versions::DEBUG);
    println!("  debug port:    {}", versions::DEBUG_PORT);

    Ok(())
}
