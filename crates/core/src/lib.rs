// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! irl-core: Data types for the isolated repo lifecycle manager
//!
//! Pure types only: the per-workspace manifest, the action request/result
//! boundary, and the package descriptor projection. All filesystem and
//! process I/O lives in `irl-adapters` and `irl-engine`.

pub mod action;
pub mod manifest;
pub mod package_descriptor;

pub use action::{Action, ActionConfig, ActionRequest, ActionResult, StdioMode};
pub use manifest::{epoch_ms_now, LifecycleStatus, Manifest, PackageManager, MANIFEST_FILE};
pub use package_descriptor::PackageDescriptor;
