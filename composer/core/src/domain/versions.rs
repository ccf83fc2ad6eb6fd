// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Pinned tool and image versions for the development environment.
//!
//! Everything here is fixed at compile time. The handful of derived values
//! (release download URLs, the user home directory) are computed once at
//! first use and read-only thereafter.

use std::path::PathBuf;
use std::sync::LazyLock;

pub const GOLANGCI_LINT_VERSION: &str = "v1.61.0";
pub const GO_VERSION: &str = "1.23.2";
pub const SYFT_VERSION: &str = "v1.9.0";
pub const GORELEASER_VERSION: &str = "v2.3.2";

/// Tag of the upstream registry used when pulling its source code.
pub const REGISTRY_SRC_TAG: &str = "v2.8.3";
/// Source of the upstream distribution code.
pub const DISTRIBUTION_SRC: &str = "https://github.com/distribution/distribution.git";

pub const NPM_REGISTRY: &str = "https://registry.npmjs.org";

/// Vulnerability scanner and its adapter, pinned as a pair.
pub const TRIVY_VERSION: &str = "v0.56.1";
pub const TRIVY_ADAPTER_VERSION: &str = "v0.32.0-rc.1";

pub const DEV_PLATFORM: &str = "linux/amd64";
pub const DEV_VERSION: &str = "dev";

pub const DEBUG: bool = true;
pub const DEBUG_PORT: u16 = 4001;

pub static TRIVY_VERSION_NO_PREFIX: LazyLock<&'static str> =
    LazyLock::new(|| strip_version_prefix(TRIVY_VERSION));

pub static TRIVY_DOWNLOAD_URL: LazyLock<String> =
    LazyLock::new(|| trivy_download_url(TRIVY_VERSION));

pub static TRIVY_ADAPTER_DOWNLOAD_URL: LazyLock<String> =
    LazyLock::new(|| trivy_adapter_download_url(TRIVY_ADAPTER_VERSION));

pub static USER_HOME_DIR: LazyLock<PathBuf> =
    LazyLock::new(|| dirs::home_dir().unwrap_or_default());

/// Strip a leading `v` from a version tag.
///
/// A no-op when the tag carries no prefix.
pub fn strip_version_prefix(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Release-asset download URL for the vulnerability scanner.
///
/// The release tag keeps the `v` prefix while the asset name drops it.
pub fn trivy_download_url(version: &str) -> String {
    format!(
        "https://github.com/aquasecurity/trivy/releases/download/{}/trivy_{}_Linux-64bit.tar.gz",
        version,
        strip_version_prefix(version)
    )
}

/// Source-archive download URL for the scanner adapter.
pub fn trivy_adapter_download_url(version: &str) -> String {
    format!("https://github.com/goharbor/harbor-scanner-trivy/archive/refs/tags/{version}.tar.gz")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_version_prefix() {
        assert_eq!(strip_version_prefix("v0.56.1"), "0.56.1");
        assert_eq!(strip_version_prefix("v2.3.2"), "2.3.2");
        assert_eq!(strip_version_prefix("1.23.2"), "1.23.2");
    }

    #[test]
    fn test_strip_version_prefix_is_idempotent() {
        let once = strip_version_prefix("v12.34.56");
        let twice = strip_version_prefix(once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strip_version_prefix_only_removes_leading_v() {
        // An inner `v` is part of the tag, not a prefix.
        assert_eq!(strip_version_prefix("v1.0.0-dev"), "1.0.0-dev");
        assert_eq!(strip_version_prefix("1.0.0-dev"), "1.0.0-dev");
    }

    #[test]
    fn test_trivy_download_url_substitutes_stripped_version() {
        assert_eq!(
            trivy_download_url("v0.56.1"),
            "https://github.com/aquasecurity/trivy/releases/download/v0.56.1/trivy_0.56.1_Linux-64bit.tar.gz"
        );
        assert_eq!(
            trivy_download_url("v9.9.9"),
            "https://github.com/aquasecurity/trivy/releases/download/v9.9.9/trivy_9.9.9_Linux-64bit.tar.gz"
        );
    }

    #[test]
    fn test_trivy_adapter_download_url_keeps_full_tag() {
        assert_eq!(
            trivy_adapter_download_url("v0.32.0-rc.1"),
            "https://github.com/goharbor/harbor-scanner-trivy/archive/refs/tags/v0.32.0-rc.1.tar.gz"
        );
    }

    #[test]
    fn test_derived_statics_agree_with_pure_functions() {
        assert_eq!(*TRIVY_VERSION_NO_PREFIX, strip_version_prefix(TRIVY_VERSION));
        assert_eq!(*TRIVY_DOWNLOAD_URL, trivy_download_url(TRIVY_VERSION));
        assert_eq!(
            *TRIVY_ADAPTER_DOWNLOAD_URL,
            trivy_adapter_download_url(TRIVY_ADAPTER_VERSION)
        );
    }
}
