// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unload action: stop anything running, then remove the workspace

use super::ActionContext;
use crate::error::LifecycleError;
use irl_adapters::process;
use irl_adapters::subprocess::STOP_GRACE;
use irl_core::{Action, ActionResult, LifecycleStatus};

pub(crate) async fn execute(ctx: &ActionContext<'_>) -> Result<ActionResult, LifecycleError> {
    if !ctx.store.exists(ctx.repo_id()) {
        // Unloading an absent workspace succeeds trivially
        return Ok(ActionResult::ok(Action::Unload, ctx.repo_id())
            .with_message("no workspace to unload"));
    }

    // Best-effort termination of a recorded running instance. A corrupt or
    // missing manifest must not block removal.
    if let Ok(Some(manifest)) = ctx.store.try_load_manifest(ctx.repo_id()) {
        if manifest.status == LifecycleStatus::Running {
            if let Some(pid) = manifest.process_id {
                tracing::info!(repo_id = ctx.repo_id(), pid, "terminating before unload");
                if let Err(err) = process::terminate_with_grace(pid, STOP_GRACE).await {
                    tracing::warn!(
                        repo_id = ctx.repo_id(),
                        pid,
                        error = %err,
                        "termination before unload failed, removing anyway"
                    );
                }
            }
        }
    }

    ctx.store.remove_workspace(ctx.repo_id()).await?;

    Ok(ActionResult::ok(Action::Unload, ctx.repo_id()).with_message("workspace removed"))
}
