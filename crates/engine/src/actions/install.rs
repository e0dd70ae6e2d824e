// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Install action: resolve the package manager and install dependencies

use super::{output_tail, ActionContext};
use crate::error::LifecycleError;
use irl_adapters::pkgman;
use irl_adapters::subprocess::{run_with_timeout, INSTALL_TIMEOUT};
use irl_core::{Action, ActionResult};
use std::fs;
use tokio::process::Command;

/// Bytes of tool output kept in failure details.
const OUTPUT_TAIL_BYTES: usize = 2000;

pub(crate) async fn execute(ctx: &ActionContext<'_>) -> Result<ActionResult, LifecycleError> {
    let mut manifest = ctx.store.load_manifest(ctx.repo_id())?;
    let workspace = ctx.store.workspace_path(ctx.repo_id());
    let production = ctx.request.config.production;

    // Caller preference, then lock-file detection; availability overrides
    // both (silent downgrade to npm, logged inside resolve).
    let manager = pkgman::resolve(ctx.request.config.package_manager, &workspace).await;

    let cache_dir = ctx.store.cache_dir(ctx.repo_id(), manager.command_name());
    fs::create_dir_all(&cache_dir)?;

    let args = pkgman::install_args(manager, production, &cache_dir);
    tracing::info!(
        repo_id = ctx.repo_id(),
        manager = %manager,
        production,
        "installing dependencies"
    );

    let mut cmd = Command::new(manager.command_name());
    cmd.args(&args).current_dir(&workspace);
    let output = run_with_timeout(cmd, INSTALL_TIMEOUT, "dependency install").await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LifecycleError::ExternalToolFailure {
            tool: manager.command_name().to_string(),
            code: output.status.code().unwrap_or(-1),
            detail: output_tail(&stderr, OUTPUT_TAIL_BYTES),
        });
    }

    // Record the manager actually used (it may differ from both the caller
    // preference and the clone-time detection after a fallback)
    manifest.package_manager = manager;
    ctx.store.save_manifest(ctx.repo_id(), &manifest)?;

    Ok(ActionResult::ok(Action::Install, ctx.repo_id())
        .with_field("packageManager", serde_json::json!(manager))
        .with_field("production", serde_json::json!(production))
        .with_message(format!("dependencies installed with {}", manager)))
}
