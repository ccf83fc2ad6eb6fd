// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! The catalog of platform components the dev environment can run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A platform component with a known wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// Reverse proxy fronting the dev topology.
    Proxy,
    /// Web portal.
    Portal,
    /// Asynchronous job service.
    JobService,
    /// Core API service.
    Core,
    /// Registry-control sidecar service.
    RegistryCtl,
    /// The registry itself.
    Registry,
    /// Backing database.
    Database,
    /// Backing cache.
    Cache,
}

impl Component {
    pub const ALL: [Component; 8] = [
        Component::Proxy,
        Component::Portal,
        Component::JobService,
        Component::Core,
        Component::RegistryCtl,
        Component::Registry,
        Component::Database,
        Component::Cache,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Component::Proxy => "proxy",
            Component::Portal => "portal",
            Component::JobService => "jobservice",
            Component::Core => "core",
            Component::RegistryCtl => "registryctl",
            Component::Registry => "registry",
            Component::Database => "database",
            Component::Cache => "cache",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("unknown component: {0}")]
pub struct UnknownComponent(pub String);

impl FromStr for Component {
    type Err = UnknownComponent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Component::ALL
            .iter()
            .find(|c| c.name() == s)
            .copied()
            .ok_or_else(|| UnknownComponent(s.to_string()))
    }
}
