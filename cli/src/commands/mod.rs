// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod config;
pub mod describe;
pub mod up;
pub mod versions;

pub use config::ConfigCommand;
pub use describe::DescribeCommand;
pub use up::UpCommand;
