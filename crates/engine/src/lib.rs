// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! irl-engine: Lifecycle semantics for isolated repository workspaces
//!
//! The engine is invoked once per action. All cross-invocation state lives
//! in the per-workspace manifest file and in OS process ids; nothing here
//! survives the execution unit except the processes it deliberately leaves
//! running.

pub mod actions;
mod dispatch;
pub mod error;
pub mod workspace;

pub use dispatch::{dispatch, DispatchOutcome, Followup, SupervisedChild};
pub use error::LifecycleError;
pub use workspace::WorkspaceStore;
