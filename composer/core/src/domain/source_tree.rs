// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Source-tree path resolution.
//!
//! A read-only view over the platform source checkout. Configuration files
//! are resolved relative to the checkout root; a missing path is an error at
//! resolution time, before any engine call is made.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceTreeError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config directory not found: {0}")]
    DirectoryNotFound(PathBuf),
}

#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
}

impl SourceTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a file relative to the checkout root.
    pub fn file(&self, relative: &str) -> Result<PathBuf, SourceTreeError> {
        let path = self.root.join(relative);
        if path.is_file() {
            Ok(path)
        } else {
            Err(SourceTreeError::FileNotFound(path))
        }
    }

    /// Resolve a directory relative to the checkout root.
    pub fn directory(&self, relative: &str) -> Result<PathBuf, SourceTreeError> {
        let path = self.root.join(relative);
        if path.is_dir() {
            Ok(path)
        } else {
            Err(SourceTreeError::DirectoryNotFound(path))
        }
    }
}
