// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Package-manager detection, probing, and install command construction
//!
//! Detection is lock-file based in fixed precedence order (most specific
//! first). Availability is the overriding constraint: a preferred or
//! detected tool that is missing from PATH is downgraded to npm, logged
//! rather than surfaced as an error.

use crate::subprocess::{run_with_timeout, TOOL_PROBE_TIMEOUT};
use irl_core::PackageManager;
use std::path::Path;
use tokio::process::Command;

/// Detect the package manager a repository expects from its lock file.
pub fn detect(workspace: &Path) -> PackageManager {
    if workspace.join("yarn.lock").exists() {
        PackageManager::Yarn
    } else if workspace.join("pnpm-lock.yaml").exists() {
        PackageManager::Pnpm
    } else {
        // package-lock.json or no lock file at all
        PackageManager::Npm
    }
}

/// Probe whether the tool is runnable on PATH.
pub async fn is_available(manager: PackageManager) -> bool {
    let mut cmd = Command::new(manager.command_name());
    cmd.arg("--version");
    match run_with_timeout(cmd, TOOL_PROBE_TIMEOUT, "package manager probe").await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

/// Resolve the manager to use for an install: explicit preference if given,
/// else lock-file detection; then fall back to npm when the chosen tool is
/// unavailable.
pub async fn resolve(preferred: Option<PackageManager>, workspace: &Path) -> PackageManager {
    let chosen = preferred.unwrap_or_else(|| detect(workspace));
    if is_available(chosen).await {
        return chosen;
    }
    if chosen != PackageManager::Npm {
        tracing::warn!(
            preferred = %chosen,
            "package manager unavailable, falling back to npm"
        );
    }
    PackageManager::Npm
}

/// Build the install invocation for a manager.
///
/// `production` selects the clean/frozen variant. The cache directory is
/// redirected into `cache_dir` so concurrent installs for different
/// repositories never share a global cache.
pub fn install_args(
    manager: PackageManager,
    production: bool,
    cache_dir: &Path,
) -> Vec<String> {
    let cache = cache_dir.display().to_string();
    let mut args: Vec<String> = match (manager, production) {
        (PackageManager::Npm, true) => vec!["ci".into(), "--omit=dev".into()],
        (PackageManager::Npm, false) => vec!["install".into()],
        (PackageManager::Yarn, true) => vec![
            "install".into(),
            "--frozen-lockfile".into(),
            "--production".into(),
        ],
        (PackageManager::Yarn, false) => vec!["install".into()],
        (PackageManager::Pnpm, true) => vec![
            "install".into(),
            "--frozen-lockfile".into(),
            "--prod".into(),
        ],
        (PackageManager::Pnpm, false) => vec!["install".into()],
    };
    match manager {
        PackageManager::Npm => {
            args.push("--cache".into());
            args.push(cache);
        }
        PackageManager::Yarn => {
            args.push("--cache-folder".into());
            args.push(cache);
        }
        PackageManager::Pnpm => {
            args.push("--store-dir".into());
            args.push(cache);
        }
    }
    args
}

#[cfg(test)]
#[path = "pkgman_tests.rs"]
mod tests;
