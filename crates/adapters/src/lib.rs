// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! irl-adapters: Boundaries to the outside world
//!
//! Everything that touches an external tool or the OS process table lives
//! here: bounded subprocess execution, the git CLI, package-manager
//! detection/probing, and PID-based child process control.

pub mod git;
pub mod pkgman;
pub mod process;
pub mod subprocess;

pub use git::{GitError, GitOperator, GitSnapshot};
pub use process::SpawnError;
pub use subprocess::SubprocessError;
