// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Docker-backed service engine.
//!
//! Converts service descriptors into containers and starts them. The engine
//! owns everything that runs; descriptor construction never reaches it.

use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, RemoveContainerOptions, StartContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::service::{HealthConfig, HostConfig};
use bollard::Docker;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::domain::engine::{EngineError, ImageResolver, ServiceEngine, ServiceId, ServiceStatus};
use crate::domain::service::{ImageSource, ServiceDescriptor};
use crate::domain::versions::DEV_PLATFORM;

/// Label carrying the platform component a container runs.
pub const COMPONENT_LABEL: &str = "ai.100monkeys.wharf.component";
/// Label prefix recording declared service bindings.
pub const BINDING_LABEL: &str = "ai.100monkeys.wharf.binding";

pub struct DockerEngine {
    docker: Docker,
    resolver: Box<dyn ImageResolver>,
    platform: String,
}

impl DockerEngine {
    /// Connect to the local Docker daemon.
    pub fn new(resolver: Box<dyn ImageResolver>) -> Result<Self, EngineError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| EngineError::Connection(e.to_string()))?;
        Ok(Self {
            docker,
            resolver,
            platform: DEV_PLATFORM.to_string(),
        })
    }

    /// Connect through an explicit socket path.
    pub fn with_socket(path: &str, resolver: Box<dyn ImageResolver>) -> Result<Self, EngineError> {
        #[cfg(unix)]
        let result = Docker::connect_with_unix(path, 120, bollard::API_DEFAULT_VERSION);

        #[cfg(windows)]
        let result = Docker::connect_with_named_pipe(path, 120, bollard::API_DEFAULT_VERSION);

        let docker = result.map_err(|e| {
            EngineError::Connection(format!("failed to connect to Docker at {path}: {e}"))
        })?;
        Ok(Self {
            docker,
            resolver,
            platform: DEV_PLATFORM.to_string(),
        })
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Verify the daemon is reachable.
    pub async fn healthcheck(&self) -> Result<(), EngineError> {
        self.docker
            .ping()
            .await
            .map_err(|e| EngineError::Connection(e.to_string()))?;
        Ok(())
    }

    /// Built images must already exist locally (the platform build step owns
    /// them); registry references are pulled on demand.
    async fn ensure_image(&self, source: &ImageSource, reference: &str) -> Result<(), EngineError> {
        if self.docker.inspect_image(reference).await.is_ok() {
            return Ok(());
        }

        match source {
            ImageSource::Built { name } => Err(EngineError::ImageUnavailable(format!(
                "{reference} not found locally; run the platform image build for {name} first"
            ))),
            ImageSource::Pull { .. } => {
                info!(image = reference, "pulling image");
                let options = Some(CreateImageOptions {
                    from_image: reference.to_string(),
                    platform: self.platform.clone(),
                    ..Default::default()
                });

                let mut stream = self.docker.create_image(options, None, None);
                while let Some(result) = stream.next().await {
                    result.map_err(|e| {
                        EngineError::ImageUnavailable(format!("failed to pull {reference}: {e}"))
                    })?;
                }
                Ok(())
            }
        }
    }
}

#[async_trait]
impl ServiceEngine for DockerEngine {
    async fn launch(&self, descriptor: &ServiceDescriptor) -> Result<ServiceId, EngineError> {
        let reference = self.resolver.resolve(&descriptor.image);
        self.ensure_image(&descriptor.image, &reference).await?;

        let options = CreateContainerOptions {
            name: format!("wharf-{}-{}", descriptor.component, Uuid::new_v4()),
            platform: None,
        };
        let config = container_config(descriptor, &reference);

        let created = self
            .docker
            .create_container(Some(options), config)
            .await
            .map_err(|e| EngineError::LaunchFailed(e.to_string()))?;
        let id = created.id;

        self.docker
            .start_container(&id, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| EngineError::LaunchFailed(format!("failed to start container: {e}")))?;

        info!(component = %descriptor.component, container = %id, "launched service container");
        Ok(ServiceId::new(id))
    }

    async fn terminate(&self, id: &ServiceId) -> Result<(), EngineError> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };

        self.docker
            .remove_container(id.as_str(), Some(options))
            .await
            .map_err(|e| EngineError::StopFailed(e.to_string()))?;

        info!(container = %id, "terminated service container");
        Ok(())
    }

    async fn status(&self, id: &ServiceId) -> Result<ServiceStatus, EngineError> {
        let inspect = self
            .docker
            .inspect_container(id.as_str(), None)
            .await
            .map_err(|e| EngineError::NotFound(e.to_string()))?;

        let state = inspect.state.unwrap_or_default();
        let status = state
            .status
            .unwrap_or(bollard::models::ContainerStateStatusEnum::DEAD);
        let started_at = state
            .started_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));

        Ok(ServiceStatus {
            id: id.clone(),
            state: format!("{status:?}"),
            started_at,
        })
    }
}

/// Translate a descriptor into a container configuration.
///
/// Withheld ports are simply never exposed; a descriptor with any
/// skip-healthcheck port suppresses the image's own startup check, which is
/// known unreliable in this topology.
fn container_config(descriptor: &ServiceDescriptor, image: &str) -> Config<String> {
    let mut binds: Vec<String> = descriptor
        .file_mounts
        .iter()
        .map(|m| format!("{}:{}", m.source.display(), m.target))
        .collect();
    binds.extend(
        descriptor
            .directory_mounts
            .iter()
            .map(|m| format!("{}:{}", m.source.display(), m.target)),
    );

    let exposed_ports: HashMap<String, HashMap<(), ()>> = descriptor
        .exposed_ports
        .iter()
        .map(|p| (format!("{}/tcp", p.port), HashMap::new()))
        .collect();

    let env: Vec<String> = descriptor
        .env
        .iter()
        .map(|v| format!("{}={}", v.name, v.value))
        .collect();

    let mut labels = HashMap::new();
    labels.insert(
        COMPONENT_LABEL.to_string(),
        descriptor.component.name().to_string(),
    );
    for binding in &descriptor.bindings {
        labels.insert(
            format!("{}/{}", BINDING_LABEL, binding.alias),
            binding.component.name().to_string(),
        );
    }

    let healthcheck = descriptor
        .exposed_ports
        .iter()
        .any(|p| p.skip_healthcheck)
        .then(|| HealthConfig {
            test: Some(vec!["NONE".to_string()]),
            ..Default::default()
        });

    let host_config = HostConfig {
        binds: (!binds.is_empty()).then_some(binds),
        privileged: Some(descriptor.insecure_root_capabilities),
        ..Default::default()
    };

    Config {
        image: Some(image.to_string()),
        env: (!env.is_empty()).then_some(env),
        entrypoint: launch_command(descriptor),
        exposed_ports: (!exposed_ports.is_empty()).then_some(exposed_ports),
        labels: Some(labels),
        healthcheck,
        host_config: Some(host_config),
        ..Default::default()
    }
}

/// Fold setup steps and the entrypoint into one launch command.
///
/// Setup (e.g. marking the launch script executable) must happen before the
/// service process starts, so both are chained under a single shell.
fn launch_command(descriptor: &ServiceDescriptor) -> Option<Vec<String>> {
    if descriptor.exec_steps.is_empty() {
        return descriptor.entrypoint.clone();
    }

    let mut script = descriptor
        .exec_steps
        .iter()
        .map(|step| shell_join(step))
        .collect::<Vec<_>>()
        .join(" && ");

    if let Some(entrypoint) = &descriptor.entrypoint {
        script.push_str(" && exec ");
        script.push_str(&shell_join(entrypoint));
    }

    Some(vec!["/bin/sh".to_string(), "-c".to_string(), script])
}

fn shell_join(argv: &[String]) -> String {
    argv.iter()
        .map(|a| shell_quote(a))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}
