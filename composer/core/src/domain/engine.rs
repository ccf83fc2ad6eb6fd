// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Engine seams.
//!
//! [`ServiceEngine`] is the boundary to the container-orchestration engine
//! that instantiates descriptors; [`ImageResolver`] maps symbolic image
//! sources to concrete references. Both are implemented against Docker in
//! the infrastructure layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::service::{ImageSource, ServiceDescriptor};

/// Identifier of a running service, as issued by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to connect to engine: {0}")]
    Connection(String),

    #[error("image not available: {0}")]
    ImageUnavailable(String),

    #[error("failed to launch service: {0}")]
    LaunchFailed(String),

    #[error("failed to stop service: {0}")]
    StopFailed(String),

    #[error("service not found: {0}")]
    NotFound(String),
}

/// Point-in-time state of a launched service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub id: ServiceId,
    pub state: String,
    pub started_at: Option<DateTime<Utc>>,
}

/// The container-orchestration engine owning process execution and
/// networking. Wharf only constructs descriptors; everything that runs,
/// runs here.
#[async_trait]
pub trait ServiceEngine: Send + Sync {
    /// Create and start a container for the descriptor.
    async fn launch(&self, descriptor: &ServiceDescriptor) -> Result<ServiceId, EngineError>;

    /// Force-remove a launched service.
    async fn terminate(&self, id: &ServiceId) -> Result<(), EngineError>;

    async fn status(&self, id: &ServiceId) -> Result<ServiceStatus, EngineError>;
}

/// Maps a symbolic image source to a concrete image reference.
///
/// Built sources name images produced by the platform build step, which is
/// outside this crate; the resolver only knows what they are called.
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, image: &ImageSource) -> String;
}
