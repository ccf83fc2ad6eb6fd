// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Image reference resolution.

use crate::domain::engine::ImageResolver;
use crate::domain::service::ImageSource;
use crate::domain::versions::DEV_VERSION;

/// Resolves built component names to the platform's dev-tagged registry
/// references and passes pull references through untouched.
///
/// Producing the built images is the platform build pipeline's job; the
/// resolver only knows what they are called.
pub struct DevImageResolver {
    namespace: String,
    tag: String,
}

impl DevImageResolver {
    pub fn new() -> Self {
        Self::with_tag(DEV_VERSION)
    }

    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self {
            namespace: "goharbor".to_string(),
            tag: tag.into(),
        }
    }
}

impl Default for DevImageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageResolver for DevImageResolver {
    fn resolve(&self, image: &ImageSource) -> String {
        match image {
            ImageSource::Pull { reference } => reference.clone(),
            ImageSource::Built { name } => {
                // nginx and the registry ship on photon-based repositories;
                // everything else is published under the platform prefix.
                let repository = match name.as_str() {
                    "nginx" => "nginx-photon".to_string(),
                    "registry" => "registry-photon".to_string(),
                    other => format!("harbor-{other}"),
                };
                format!("{}/{}:{}", self.namespace, repository, self.tag)
            }
        }
    }
}
