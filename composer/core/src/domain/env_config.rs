// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Dev-environment configuration manifest.
//!
//! Kubernetes-style manifest (apiVersion/kind/metadata/spec) holding the few
//! knobs the composer honors: where the source checkout lives, which
//! platform to target, the debug flag, and overrides for the database
//! password and built-image tag. Discovery order: explicit path →
//! `WHARF_CONFIG_PATH` → `./wharf-config.yaml` → built-in defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::versions::{DEBUG, DEV_PLATFORM, DEV_VERSION};
use crate::domain::wiring::DEFAULT_DATABASE_PASSWORD;

pub const API_VERSION: &str = "100monkeys.ai/v1";
pub const KIND: &str = "DevEnvConfig";

/// Environment variable naming an explicit config path.
pub const CONFIG_PATH_ENV: &str = "WHARF_CONFIG_PATH";

const DISCOVERY_PATHS: &[&str] = &["./wharf-config.yaml", "/etc/wharf/config.yaml"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported apiVersion: {0}")]
    UnsupportedApiVersion(String),

    #[error("unsupported kind: {0}")]
    UnsupportedKind(String),
}

/// Top-level manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevEnvManifest {
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: DevEnvSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

/// Configuration specification (content under `spec:`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevEnvSpec {
    /// Root of the platform source checkout.
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    /// Target platform for built images.
    #[serde(default = "default_platform")]
    pub platform: String,

    #[serde(default = "default_debug")]
    pub debug: bool,

    /// Development database superuser password.
    #[serde(default = "default_database_password")]
    pub database_password: String,

    /// Tag applied to built component images.
    #[serde(default = "default_image_tag")]
    pub image_tag: String,
}

fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_platform() -> String {
    DEV_PLATFORM.to_string()
}

fn default_debug() -> bool {
    DEBUG
}

fn default_database_password() -> String {
    DEFAULT_DATABASE_PASSWORD.to_string()
}

fn default_image_tag() -> String {
    DEV_VERSION.to_string()
}

impl Default for DevEnvSpec {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            platform: default_platform(),
            debug: default_debug(),
            database_password: default_database_password(),
            image_tag: default_image_tag(),
        }
    }
}

impl DevEnvManifest {
    /// Built-in defaults, used when no config file is discovered.
    pub fn default_manifest() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "local".to_string(),
                labels: None,
            },
            spec: DevEnvSpec::default(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Self = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load from an explicit path, the environment, or the discovery paths;
    /// fall back to defaults when nothing is found.
    pub fn load_or_default(path_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        if let Some(path) = path_override {
            return Self::load(&path);
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::load(Path::new(&path));
        }
        for candidate in DISCOVERY_PATHS {
            let path = Path::new(candidate);
            if path.is_file() {
                return Self::load(path);
            }
        }
        Ok(Self::default_manifest())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_version != API_VERSION {
            return Err(ConfigError::UnsupportedApiVersion(self.api_version.clone()));
        }
        if self.kind != KIND {
            return Err(ConfigError::UnsupportedKind(self.kind.clone()));
        }
        Ok(())
    }
}
