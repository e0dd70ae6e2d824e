// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stop action: signal the recorded pid, optimistically mark stopped

use super::ActionContext;
use crate::dispatch::Followup;
use crate::error::LifecycleError;
use irl_adapters::process;
use irl_core::{Action, ActionResult, LifecycleStatus};

pub(crate) async fn execute(
    ctx: &ActionContext<'_>,
) -> Result<(ActionResult, Option<Followup>), LifecycleError> {
    // Stopping a non-running repository is not an error, even when the
    // workspace or manifest is gone entirely
    let Some(mut manifest) = ctx.store.try_load_manifest(ctx.repo_id()).unwrap_or(None) else {
        let result = ActionResult::ok(Action::Stop, ctx.repo_id())
            .with_message("nothing to stop (no manifest)");
        return Ok((result, None));
    };

    let pid = match (manifest.status, manifest.process_id) {
        (LifecycleStatus::Running, Some(pid)) => pid,
        _ => {
            let result = ActionResult::ok(Action::Stop, ctx.repo_id())
                .with_message(format!("repo '{}' is not running (no-op)", ctx.repo_id()));
            return Ok((result, None));
        }
    };

    tracing::info!(repo_id = ctx.repo_id(), pid, "stopping process");
    process::terminate(pid)?;

    // Optimistic: the manifest says stopped as soon as the signal is sent;
    // the grace-period SIGKILL runs after the result is reported
    manifest.mark_stopped(None, None);
    ctx.store.save_manifest(ctx.repo_id(), &manifest)?;

    let result = ActionResult::ok(Action::Stop, ctx.repo_id())
        .with_field("signaled", serde_json::json!(pid))
        .with_message(format!("termination signal sent to {}", pid));
    Ok((result, Some(Followup::GraceKill { pid })))
}
