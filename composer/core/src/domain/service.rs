// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Service descriptor value objects.
//!
//! A [`ServiceDescriptor`] is the in-memory specification of a runnable
//! container service (image, mounts, ports, entrypoint) prior to being
//! started. The builder verbs mirror the operations the engine understands;
//! none of them touch the engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::component::Component;

/// Where the service image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImageSource {
    /// Image produced for a component by the platform build step.
    Built { name: String },
    /// Image pulled as-is from a public registry.
    Pull { reference: String },
}

/// A single file mounted into the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMount {
    /// Resolved host path.
    pub source: PathBuf,
    /// Absolute container path.
    pub target: String,
}

/// A directory mounted into the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryMount {
    pub source: PathBuf,
    pub target: String,
}

/// An environment variable set on the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

/// A network port the service listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposedPort {
    pub port: u16,
    /// Skip the engine's startup health check for this port.
    #[serde(default)]
    pub skip_healthcheck: bool,
}

/// A declared dependency on another composed service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBinding {
    /// Hostname the depending service uses to reach the target.
    pub alias: String,
    pub component: Component,
}

/// In-memory specification of a runnable container service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub component: Component,
    pub image: ImageSource,
    #[serde(default)]
    pub file_mounts: Vec<FileMount>,
    #[serde(default)]
    pub directory_mounts: Vec<DirectoryMount>,
    #[serde(default)]
    pub env: Vec<EnvVar>,
    #[serde(default)]
    pub exposed_ports: Vec<ExposedPort>,
    /// Ports deliberately not exposed in the dev topology (e.g. TLS ports
    /// withheld in favor of plaintext debug ports).
    #[serde(default)]
    pub withheld_ports: Vec<u16>,
    /// Setup commands run ahead of the entrypoint.
    #[serde(default)]
    pub exec_steps: Vec<Vec<String>>,
    /// `None` keeps the image's own entrypoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<Vec<String>>,
    /// Grant elevated container capabilities.
    #[serde(default)]
    pub insecure_root_capabilities: bool,
    #[serde(default)]
    pub bindings: Vec<ServiceBinding>,
}

impl ServiceDescriptor {
    pub fn new(component: Component, image: ImageSource) -> Self {
        Self {
            component,
            image,
            file_mounts: Vec::new(),
            directory_mounts: Vec::new(),
            env: Vec::new(),
            exposed_ports: Vec::new(),
            withheld_ports: Vec::new(),
            exec_steps: Vec::new(),
            entrypoint: None,
            insecure_root_capabilities: false,
            bindings: Vec::new(),
        }
    }

    pub fn with_mounted_file(mut self, source: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        self.file_mounts.push(FileMount {
            source: source.into(),
            target: target.into(),
        });
        self
    }

    pub fn with_mounted_directory(
        mut self,
        source: impl Into<PathBuf>,
        target: impl Into<String>,
    ) -> Self {
        self.directory_mounts.push(DirectoryMount {
            source: source.into(),
            target: target.into(),
        });
        self
    }

    /// Set an environment variable, replacing an earlier value of the same name.
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.env.iter_mut().find(|v| v.name == name) {
            existing.value = value;
        } else {
            self.env.push(EnvVar { name, value });
        }
        self
    }

    pub fn with_exposed_port(mut self, port: u16) -> Self {
        self.exposed_ports.push(ExposedPort {
            port,
            skip_healthcheck: false,
        });
        self
    }

    /// Expose a port without the engine's startup health check.
    pub fn with_exposed_port_no_healthcheck(mut self, port: u16) -> Self {
        self.exposed_ports.push(ExposedPort {
            port,
            skip_healthcheck: true,
        });
        self
    }

    /// Withhold a port: drop it from the exposed set and record the withholding.
    pub fn without_exposed_port(mut self, port: u16) -> Self {
        self.exposed_ports.retain(|p| p.port != port);
        if !self.withheld_ports.contains(&port) {
            self.withheld_ports.push(port);
        }
        self
    }

    /// Append a setup command run ahead of the entrypoint.
    pub fn with_exec(mut self, argv: Vec<String>) -> Self {
        self.exec_steps.push(argv);
        self
    }

    pub fn with_entrypoint(mut self, argv: Vec<String>) -> Self {
        self.entrypoint = Some(argv);
        self
    }

    pub fn with_insecure_root_capabilities(mut self) -> Self {
        self.insecure_root_capabilities = true;
        self
    }

    pub fn with_service_binding(mut self, alias: impl Into<String>, component: Component) -> Self {
        self.bindings.push(ServiceBinding {
            alias: alias.into(),
            component,
        });
        self
    }

    /// Exposed port numbers, in declaration order.
    pub fn exposed_port_numbers(&self) -> Vec<u16> {
        self.exposed_ports.iter().map(|p| p.port).collect()
    }

    pub fn is_exposed(&self, port: u16) -> bool {
        self.exposed_ports.iter().any(|p| p.port == port)
    }

    /// Value of an environment variable, if set.
    pub fn env_value(&self, name: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ServiceDescriptor {
        ServiceDescriptor::new(
            Component::Registry,
            ImageSource::Built {
                name: "registry".to_string(),
            },
        )
    }

    #[test]
    fn test_exposed_ports_accumulate_in_order() {
        let d = descriptor().with_exposed_port(5000).with_exposed_port(5001);
        assert_eq!(d.exposed_port_numbers(), vec![5000, 5001]);
    }

    #[test]
    fn test_without_exposed_port_removes_and_records() {
        let d = descriptor()
            .with_exposed_port(5000)
            .with_exposed_port(5001)
            .without_exposed_port(5001)
            .without_exposed_port(5443);
        assert_eq!(d.exposed_port_numbers(), vec![5000]);
        assert_eq!(d.withheld_ports, vec![5001, 5443]);
        assert!(!d.is_exposed(5001));
    }

    #[test]
    fn test_without_exposed_port_does_not_duplicate_withholdings() {
        let d = descriptor().without_exposed_port(8443).without_exposed_port(8443);
        assert_eq!(d.withheld_ports, vec![8443]);
    }

    #[test]
    fn test_with_env_replaces_same_name() {
        let d = descriptor()
            .with_env("POSTGRES_PASSWORD", "root123")
            .with_env("POSTGRES_PASSWORD", "override");
        assert_eq!(d.env.len(), 1);
        assert_eq!(d.env_value("POSTGRES_PASSWORD"), Some("override"));
    }

    #[test]
    fn test_skip_healthcheck_flag_is_per_port() {
        let d = descriptor()
            .with_exposed_port_no_healthcheck(8080)
            .with_exposed_port(4001);
        assert!(d.exposed_ports[0].skip_healthcheck);
        assert!(!d.exposed_ports[1].skip_healthcheck);
    }

    #[test]
    fn test_builder_verbs_do_not_set_unrelated_fields() {
        let d = descriptor().with_exposed_port(5000);
        assert!(d.entrypoint.is_none());
        assert!(d.env.is_empty());
        assert!(!d.insecure_root_capabilities);
        assert!(d.bindings.is_empty());
    }

    #[test]
    fn test_descriptor_serializes_and_parses() {
        let d = descriptor()
            .with_mounted_file("/tmp/nginx.conf", "/etc/nginx/nginx.conf")
            .with_exposed_port(5000)
            .with_entrypoint(vec!["/run_script".to_string()]);
        let yaml = serde_yaml::to_string(&d).unwrap();
        let parsed: ServiceDescriptor = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, d);
    }
}
