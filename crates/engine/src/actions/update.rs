// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Update action: pull from the existing remote, refresh lastUpdated

use super::{manifest_json, ActionContext};
use crate::error::LifecycleError;
use irl_core::{epoch_ms_now, Action, ActionResult};

pub(crate) async fn execute(ctx: &ActionContext<'_>) -> Result<ActionResult, LifecycleError> {
    let mut manifest = ctx.store.load_manifest(ctx.repo_id())?;
    let workspace = ctx.store.workspace_path(ctx.repo_id());

    let summary = ctx.git.pull(&workspace).await?;

    // Self-loop: source refreshed, lifecycle status untouched
    manifest.last_updated = Some(epoch_ms_now());
    ctx.store.save_manifest(ctx.repo_id(), &manifest)?;

    Ok(ActionResult::ok(Action::Update, ctx.repo_id())
        .with_field("summary", serde_json::json!(summary))
        .with_field("manifest", manifest_json(ctx.repo_id(), &manifest)?)
        .with_message("repository updated"))
}
