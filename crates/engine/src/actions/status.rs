// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status action: read-only composite snapshot
//!
//! The only action safe to call concurrently with any other action on the
//! same repoId.

use super::{manifest_json, ActionContext};
use crate::error::LifecycleError;
use irl_core::{Action, ActionResult};

pub(crate) async fn execute(ctx: &ActionContext<'_>) -> Result<ActionResult, LifecycleError> {
    let manifest = ctx.store.load_manifest(ctx.repo_id())?;
    let workspace = ctx.store.workspace_path(ctx.repo_id());

    let git = ctx.git.snapshot(&workspace).await?;
    let dependencies_installed = ctx.store.dependencies_installed(ctx.repo_id());

    Ok(ActionResult::ok(Action::Status, ctx.repo_id())
        .with_field(
            "git",
            serde_json::json!({
                "dirty": git.dirty,
                "branch": git.branch,
                "lastCommit": git.last_commit,
            }),
        )
        .with_field("dependenciesInstalled", serde_json::json!(dependencies_installed))
        .with_field("manifest", manifest_json(ctx.repo_id(), &manifest)?)
        .with_message(format!("status: {}", manifest.status)))
}
