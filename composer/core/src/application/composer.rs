// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Dev-environment composition.
//!
//! One public constructor per platform component, all the same shape:
//! resolve config paths from the source tree, pick the image source, attach
//! mounts, declare or withhold ports, set the entrypoint, and hand back an
//! opaque startable handle. Nothing runs until the caller starts the handle
//! against an engine.

use thiserror::Error;
use tracing::debug;

use crate::domain::component::Component;
use crate::domain::engine::{EngineError, ServiceEngine, ServiceId};
use crate::domain::env_config::DevEnvSpec;
use crate::domain::service::{ImageSource, ServiceDescriptor};
use crate::domain::source_tree::{SourceTree, SourceTreeError};
use crate::domain::wiring::{wiring_for, ImageSpec};

/// Compose adds no error translation: a failure resolving a config path
/// surfaces as the source-tree error it came from.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    SourceTree(#[from] SourceTreeError),
}

/// Builds ready-to-start service descriptions for platform components.
pub struct Composer {
    source: SourceTree,
    spec: DevEnvSpec,
}

impl Composer {
    pub fn new(source: SourceTree) -> Self {
        Self {
            source,
            spec: DevEnvSpec::default(),
        }
    }

    pub fn with_spec(source: SourceTree, spec: DevEnvSpec) -> Self {
        Self { source, spec }
    }

    pub fn proxy_service(&self) -> Result<ComposedService, ComposeError> {
        self.compose(Component::Proxy)
    }

    pub fn portal_service(&self) -> Result<ComposedService, ComposeError> {
        self.compose(Component::Portal)
    }

    pub fn job_service(&self) -> Result<ComposedService, ComposeError> {
        self.compose(Component::JobService)
    }

    pub fn core_service(&self) -> Result<ComposedService, ComposeError> {
        self.compose(Component::Core)
    }

    pub fn registry_ctl_service(&self) -> Result<ComposedService, ComposeError> {
        self.compose(Component::RegistryCtl)
    }

    pub fn registry_service(&self) -> Result<ComposedService, ComposeError> {
        self.compose(Component::Registry)
    }

    pub fn database_service(&self) -> Result<ComposedService, ComposeError> {
        self.compose(Component::Database)
    }

    pub fn cache_service(&self) -> Result<ComposedService, ComposeError> {
        self.compose(Component::Cache)
    }

    /// Compose by component, same contract as the named constructors.
    pub fn service(&self, component: Component) -> Result<ComposedService, ComposeError> {
        self.compose(component)
    }

    /// The generic table-driven compose step behind every constructor.
    fn compose(&self, component: Component) -> Result<ComposedService, ComposeError> {
        let wiring = wiring_for(component);

        let image = match wiring.image {
            ImageSpec::Built(name) => ImageSource::Built {
                name: name.to_string(),
            },
            ImageSpec::Pull(reference) => ImageSource::Pull {
                reference: reference.to_string(),
            },
        };

        let mut descriptor = ServiceDescriptor::new(component, image);

        for (source_rel, target) in wiring.file_mounts {
            descriptor = descriptor.with_mounted_file(self.source.file(source_rel)?, *target);
        }
        for (source_rel, target) in wiring.directory_mounts {
            descriptor =
                descriptor.with_mounted_directory(self.source.directory(source_rel)?, *target);
        }

        for (name, value) in wiring.env {
            descriptor = descriptor.with_env(*name, *value);
        }
        if component == Component::Database {
            descriptor = descriptor.with_env("POSTGRES_PASSWORD", self.spec.database_password.clone());
        }

        for port in wiring.exposed_ports {
            descriptor = if port.skip_healthcheck {
                descriptor.with_exposed_port_no_healthcheck(port.port)
            } else {
                descriptor.with_exposed_port(port.port)
            };
        }
        for port in wiring.withheld_ports {
            descriptor = descriptor.without_exposed_port(*port);
        }

        for step in wiring.exec_steps {
            descriptor = descriptor.with_exec(step.iter().map(|s| s.to_string()).collect());
        }
        if !wiring.entrypoint.is_empty() {
            descriptor =
                descriptor.with_entrypoint(wiring.entrypoint.iter().map(|s| s.to_string()).collect());
        }

        if wiring.insecure_root_capabilities {
            descriptor = descriptor.with_insecure_root_capabilities();
        }
        for (alias, target) in wiring.bindings {
            descriptor = descriptor.with_service_binding(*alias, *target);
        }

        debug!(component = %component, "composed service descriptor");
        Ok(ComposedService { descriptor })
    }
}

/// Opaque startable handle over a composed descriptor.
///
/// Composing performs no engine call; the service starts when the caller
/// hands the handle to an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedService {
    descriptor: ServiceDescriptor,
}

impl ComposedService {
    pub fn component(&self) -> Component {
        self.descriptor.component
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub async fn start(&self, engine: &dyn ServiceEngine) -> Result<ServiceId, EngineError> {
        engine.launch(&self.descriptor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    /// Scaffold a source checkout carrying every config file the table names.
    fn scaffold(root: &Path) {
        for dir in [
            "devenv/config/proxy",
            "devenv/config/jobservice",
            "devenv/config/core",
            "devenv/config/registry",
            "devenv/config/registryctl",
        ] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        for file in [
            "devenv/config/proxy/nginx.conf",
            "devenv/config/jobservice/config.yml",
            "devenv/config/jobservice/env",
            "devenv/config/core/app.conf",
            "devenv/config/core/env",
            "devenv/config/registryctl/config.yml",
            "devenv/config/run_env.sh",
            "devenv/config/run_debug.sh",
        ] {
            fs::write(root.join(file), "").unwrap();
        }
    }

    fn composer(dir: &tempfile::TempDir) -> Composer {
        scaffold(dir.path());
        Composer::new(SourceTree::new(dir.path()))
    }

    #[test]
    fn test_every_component_composes() {
        let dir = tempfile::tempdir().unwrap();
        let composer = composer(&dir);
        for component in Component::ALL {
            let service = composer.service(component).unwrap();
            assert_eq!(service.component(), component);
        }
    }

    #[test]
    fn test_compose_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let composer = composer(&dir);
        let first = composer.core_service().unwrap();
        let second = composer.core_service().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_config_file_propagates_unmodified() {
        let dir = tempfile::tempdir().unwrap();
        let composer = Composer::new(SourceTree::new(dir.path()));
        let err = composer.proxy_service().unwrap_err();
        let ComposeError::SourceTree(inner) = err;
        assert!(matches!(inner, SourceTreeError::FileNotFound(_)));
    }

    #[test]
    fn test_database_password_override_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        scaffold(dir.path());
        let spec = DevEnvSpec {
            database_password: "s3cret".to_string(),
            ..DevEnvSpec::default()
        };
        let composer = Composer::with_spec(SourceTree::new(dir.path()), spec);
        let db = composer.database_service().unwrap();
        assert_eq!(db.descriptor().env_value("POSTGRES_PASSWORD"), Some("s3cret"));
    }

    #[test]
    fn test_pull_components_need_no_source_tree() {
        // Database and cache mount nothing, so an empty checkout is fine.
        let dir = tempfile::tempdir().unwrap();
        let composer = Composer::new(SourceTree::new(dir.path()));
        assert!(composer.database_service().is_ok());
        assert!(composer.cache_service().is_ok());
    }

    /// Engine double that records what it was asked to launch.
    struct RecordingEngine {
        launched: std::sync::Mutex<Vec<Component>>,
    }

    #[async_trait::async_trait]
    impl ServiceEngine for RecordingEngine {
        async fn launch(
            &self,
            descriptor: &ServiceDescriptor,
        ) -> Result<ServiceId, EngineError> {
            self.launched.lock().unwrap().push(descriptor.component);
            Ok(ServiceId::new(format!("test-{}", descriptor.component)))
        }

        async fn terminate(&self, _id: &ServiceId) -> Result<(), EngineError> {
            Ok(())
        }

        async fn status(
            &self,
            id: &ServiceId,
        ) -> Result<crate::domain::engine::ServiceStatus, EngineError> {
            Err(EngineError::NotFound(id.to_string()))
        }
    }

    #[tokio::test]
    async fn test_start_is_deferred_until_the_handle_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let composer = composer(&dir);
        let engine = RecordingEngine {
            launched: std::sync::Mutex::new(Vec::new()),
        };

        let cache = composer.cache_service().unwrap();
        assert!(engine.launched.lock().unwrap().is_empty());

        let id = cache.start(&engine).await.unwrap();
        assert_eq!(id.as_str(), "test-cache");
        assert_eq!(*engine.launched.lock().unwrap(), vec![Component::Cache]);
    }
}
