// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Per-component wiring table.
//!
//! One static record per platform component: which image to run, which
//! configuration files to mount where, which ports to expose or withhold,
//! and how to launch the process. A single generic compose step consumes
//! these records; the per-component constructors on
//! [`crate::application::composer::Composer`] are one-line delegations.

use crate::domain::component::Component;
use crate::domain::versions::DEBUG_PORT;

/// Source-tree prefix holding the dev-environment configuration files.
pub const CONFIG_ROOT: &str = "devenv/config";

/// Development database superuser password.
pub const DEFAULT_DATABASE_PASSWORD: &str = "root123";

const PROXY_CONFIG: &str = "devenv/config/proxy/nginx.conf";
const JOBSERVICE_CONFIG: &str = "devenv/config/jobservice/config.yml";
const JOBSERVICE_CONFIG_DIR: &str = "devenv/config/jobservice";
const JOBSERVICE_ENV: &str = "devenv/config/jobservice/env";
const CORE_CONFIG: &str = "devenv/config/core/app.conf";
const CORE_ENV: &str = "devenv/config/core/env";
const REGISTRY_CONFIG_DIR: &str = "devenv/config/registry";
const REGISTRYCTL_CONFIG: &str = "devenv/config/registryctl/config.yml";
const RUN_ENV_SCRIPT: &str = "devenv/config/run_env.sh";
const RUN_DEBUG_SCRIPT: &str = "devenv/config/run_debug.sh";

/// Container path the launch wrapper script is mounted at.
const RUN_SCRIPT: &str = "/run_script";
/// Container path the environment file is mounted at.
const ENV_FILE: &str = "/envFile";

/// Symbolic image reference used by the wiring table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSpec {
    /// Built for the component by the platform build step.
    Built(&'static str),
    /// Pulled as-is from a public registry.
    Pull(&'static str),
}

/// Exposed-port record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSpec {
    pub port: u16,
    pub skip_healthcheck: bool,
}

impl PortSpec {
    const fn checked(port: u16) -> Self {
        Self {
            port,
            skip_healthcheck: false,
        }
    }

    const fn unchecked(port: u16) -> Self {
        Self {
            port,
            skip_healthcheck: true,
        }
    }
}

/// Static wiring for one platform component.
#[derive(Debug, Clone, Copy)]
pub struct ComponentWiring {
    pub component: Component,
    pub image: ImageSpec,
    /// Source-tree relative path → absolute container path.
    pub file_mounts: &'static [(&'static str, &'static str)],
    pub directory_mounts: &'static [(&'static str, &'static str)],
    pub env: &'static [(&'static str, &'static str)],
    pub exposed_ports: &'static [PortSpec],
    pub withheld_ports: &'static [u16],
    /// Setup commands run ahead of the entrypoint.
    pub exec_steps: &'static [&'static [&'static str]],
    /// Empty keeps the image's own entrypoint.
    pub entrypoint: &'static [&'static str],
    pub insecure_root_capabilities: bool,
    pub bindings: &'static [(&'static str, Component)],
}

pub static WIRING: [ComponentWiring; 8] = [
    // TLS stays off in the dev topology; the debug port is exposed instead.
    ComponentWiring {
        component: Component::Proxy,
        image: ImageSpec::Built("nginx"),
        file_mounts: &[(PROXY_CONFIG, "/etc/nginx/nginx.conf")],
        directory_mounts: &[],
        env: &[],
        exposed_ports: &[PortSpec::checked(8080), PortSpec::checked(DEBUG_PORT)],
        withheld_ports: &[8443],
        exec_steps: &[],
        entrypoint: &[],
        insecure_root_capabilities: false,
        bindings: &[],
    },
    ComponentWiring {
        component: Component::Portal,
        image: ImageSpec::Built("portal"),
        file_mounts: &[(PROXY_CONFIG, "/etc/nginx/nginx.conf")],
        directory_mounts: &[],
        env: &[],
        exposed_ports: &[PortSpec::checked(8080)],
        withheld_ports: &[8443],
        exec_steps: &[],
        entrypoint: &[],
        insecure_root_capabilities: false,
        bindings: &[],
    },
    ComponentWiring {
        component: Component::JobService,
        image: ImageSpec::Built("jobservice"),
        file_mounts: &[
            (JOBSERVICE_CONFIG, "/etc/jobservice/config.yml"),
            (JOBSERVICE_ENV, ENV_FILE),
            (RUN_ENV_SCRIPT, RUN_SCRIPT),
        ],
        directory_mounts: &[(JOBSERVICE_CONFIG_DIR, "/var/log/jobs")],
        env: &[],
        exposed_ports: &[PortSpec::checked(8080)],
        withheld_ports: &[],
        exec_steps: &[&["chmod", "+x", RUN_SCRIPT]],
        entrypoint: &[RUN_SCRIPT, "/jobservice -c /etc/jobservice/config.yml"],
        insecure_root_capabilities: false,
        bindings: &[],
    },
    // The default startup check is unreliable against the core service in
    // this topology, so both ports skip it. The service needs elevated
    // capabilities to run its database migrations.
    ComponentWiring {
        component: Component::Core,
        image: ImageSpec::Built("core"),
        file_mounts: &[
            (CORE_CONFIG, "/etc/core/app.conf"),
            (CORE_ENV, ENV_FILE),
            (RUN_DEBUG_SCRIPT, RUN_SCRIPT),
        ],
        directory_mounts: &[],
        env: &[],
        exposed_ports: &[PortSpec::unchecked(8080), PortSpec::unchecked(DEBUG_PORT)],
        withheld_ports: &[],
        exec_steps: &[],
        entrypoint: &[RUN_SCRIPT, "/core", "4001"],
        insecure_root_capabilities: true,
        // Bindings to cache/database/registry/registryctl are intentionally
        // not wired; the dependency graph is still owned by the platform.
        bindings: &[],
    },
    ComponentWiring {
        component: Component::RegistryCtl,
        image: ImageSpec::Built("registryctl"),
        file_mounts: &[
            (REGISTRYCTL_CONFIG, "/etc/registryctl/config.yml"),
            (JOBSERVICE_ENV, ENV_FILE),
            (RUN_ENV_SCRIPT, RUN_SCRIPT),
        ],
        directory_mounts: &[(REGISTRY_CONFIG_DIR, "/etc/registry")],
        env: &[],
        exposed_ports: &[],
        withheld_ports: &[],
        exec_steps: &[],
        entrypoint: &[RUN_SCRIPT, "/registryctl -c /etc/registryctl/config.yml"],
        insecure_root_capabilities: false,
        bindings: &[],
    },
    // 5001 serves debug according to the registry config; neither it nor
    // the TLS port is part of the dev topology.
    ComponentWiring {
        component: Component::Registry,
        image: ImageSpec::Built("registry"),
        file_mounts: &[],
        directory_mounts: &[(REGISTRY_CONFIG_DIR, "/etc/registry")],
        env: &[],
        exposed_ports: &[PortSpec::checked(5000)],
        withheld_ports: &[5001, 5443],
        exec_steps: &[],
        entrypoint: &[],
        insecure_root_capabilities: false,
        bindings: &[],
    },
    ComponentWiring {
        component: Component::Database,
        image: ImageSpec::Pull("goharbor/harbor-db:v2.12.2"),
        file_mounts: &[],
        directory_mounts: &[],
        env: &[("POSTGRES_PASSWORD", DEFAULT_DATABASE_PASSWORD)],
        exposed_ports: &[PortSpec::checked(5432)],
        withheld_ports: &[],
        exec_steps: &[],
        entrypoint: &[],
        insecure_root_capabilities: false,
        bindings: &[],
    },
    ComponentWiring {
        component: Component::Cache,
        image: ImageSpec::Pull("goharbor/redis-photon:v2.12.2"),
        file_mounts: &[],
        directory_mounts: &[],
        env: &[],
        exposed_ports: &[PortSpec::checked(6379)],
        withheld_ports: &[],
        exec_steps: &[],
        entrypoint: &[],
        insecure_root_capabilities: false,
        bindings: &[],
    },
];

/// Wiring record for a component.
pub fn wiring_for(component: Component) -> &'static ComponentWiring {
    WIRING
        .iter()
        .find(|w| w.component == component)
        .expect("every component has a wiring record")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_component_exactly_once() {
        for component in Component::ALL {
            let count = WIRING.iter().filter(|w| w.component == component).count();
            assert_eq!(count, 1, "{component} should have exactly one record");
        }
        assert_eq!(WIRING.len(), Component::ALL.len());
    }

    #[test]
    fn test_core_entrypoint_references_the_debug_port() {
        let core = wiring_for(Component::Core);
        let last = core.entrypoint.last().unwrap();
        assert_eq!(*last, DEBUG_PORT.to_string());
    }

    #[test]
    fn test_core_ports_skip_healthcheck() {
        let core = wiring_for(Component::Core);
        assert!(core.exposed_ports.iter().all(|p| p.skip_healthcheck));
        assert_eq!(
            core.exposed_ports.iter().map(|p| p.port).collect::<Vec<_>>(),
            vec![8080, DEBUG_PORT]
        );
    }

    #[test]
    fn test_launch_script_mount_matches_entrypoint() {
        // Components launched through the wrapper script must also mount it.
        for wiring in &WIRING {
            if wiring.entrypoint.first() == Some(&RUN_SCRIPT) {
                assert!(
                    wiring.file_mounts.iter().any(|(_, target)| *target == RUN_SCRIPT),
                    "{} launches {RUN_SCRIPT} but does not mount it",
                    wiring.component
                );
            }
        }
    }

    #[test]
    fn test_config_paths_live_under_the_config_root() {
        for wiring in &WIRING {
            for (source, _) in wiring.file_mounts.iter().chain(wiring.directory_mounts) {
                assert!(
                    source.starts_with(CONFIG_ROOT),
                    "{source} escapes {CONFIG_ROOT}"
                );
            }
        }
    }

    #[test]
    fn test_only_core_gets_elevated_capabilities() {
        for wiring in &WIRING {
            assert_eq!(
                wiring.insecure_root_capabilities,
                wiring.component == Component::Core
            );
        }
    }

    #[test]
    fn test_withheld_ports_never_overlap_exposed() {
        for wiring in &WIRING {
            for withheld in wiring.withheld_ports {
                assert!(
                    !wiring.exposed_ports.iter().any(|p| p.port == *withheld),
                    "{}: port {withheld} is both exposed and withheld",
                    wiring.component
                );
            }
        }
    }
}
