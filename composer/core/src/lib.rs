// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Wharf composer core
//!
//! Builds runnable service descriptions for the components of a
//! container-registry platform's development environment.
//!
//! # Architecture
//!
//! - **domain:** version pins, the component catalog, service descriptors,
//!   the wiring table, and the engine seams
//! - **application:** the [`application::composer::Composer`] and its
//!   startable handles
//! - **infrastructure:** the Docker-backed engine and image resolution

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
