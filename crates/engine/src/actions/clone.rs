// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clone action: destructive-idempotent shallow clone plus initial manifest

use super::{manifest_json, ActionContext, DEFAULT_BRANCH, DEFAULT_DEPTH};
use crate::error::LifecycleError;
use irl_adapters::pkgman;
use irl_core::{Action, ActionResult, Manifest};

pub(crate) async fn execute(ctx: &ActionContext<'_>) -> Result<ActionResult, LifecycleError> {
    let request = ctx.request;
    let repo_url = request.repo_url.as_deref().ok_or_else(|| {
        LifecycleError::InvalidRequest("repoUrl is required for clone".to_string())
    })?;
    let branch = request
        .config
        .branch
        .clone()
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
    let depth = request.config.depth.unwrap_or(DEFAULT_DEPTH);

    ctx.store.ensure_root()?;

    // Clone never merges: a pre-existing workspace is removed wholesale so
    // the result reflects only this clone.
    if ctx.store.exists(ctx.repo_id()) {
        tracing::info!(repo_id = ctx.repo_id(), "removing existing workspace before clone");
        ctx.store.remove_workspace(ctx.repo_id()).await?;
    }

    let dest = ctx.store.workspace_path(ctx.repo_id());
    let authenticated = ctx.git.clone(repo_url, &dest, &branch, depth).await?;

    // Best-effort static classification; failures here never fail the clone
    let package_manager = match request.config.package_manager {
        Some(preferred) => preferred,
        None => pkgman::detect(&dest),
    };
    let framework = ctx
        .store
        .load_descriptor(ctx.repo_id())
        .ok()
        .and_then(|descriptor| descriptor.detect_framework());

    let manifest = Manifest::cloned(
        ctx.repo_id(),
        repo_url,
        &branch,
        depth,
        authenticated,
        package_manager,
        framework,
    );
    ctx.store.save_manifest(ctx.repo_id(), &manifest)?;

    Ok(ActionResult::ok(Action::Clone, ctx.repo_id())
        .with_field("manifest", manifest_json(ctx.repo_id(), &manifest)?)
        .with_message(format!(
            "cloned {} (branch {}, depth {})",
            repo_url, branch, depth
        )))
}
