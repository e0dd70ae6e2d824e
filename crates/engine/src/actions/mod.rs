// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One handler per lifecycle action

pub(crate) mod clone;
pub(crate) mod install;
pub(crate) mod run;
pub(crate) mod status;
pub(crate) mod stop;
pub(crate) mod unload;
pub(crate) mod update;

use crate::error::LifecycleError;
use crate::workspace::WorkspaceStore;
use irl_adapters::GitOperator;
use irl_core::{ActionRequest, Manifest};
use serde_json::Value;

/// Default clone branch.
pub(crate) const DEFAULT_BRANCH: &str = "main";

/// Default clone depth.
pub(crate) const DEFAULT_DEPTH: u32 = 1;

/// Default foreground-probe wait in milliseconds.
pub(crate) const DEFAULT_STARTUP_DELAY_MS: u64 = 3000;

/// Everything a handler needs for one action.
pub(crate) struct ActionContext<'a> {
    pub store: WorkspaceStore,
    pub git: GitOperator,
    pub request: &'a ActionRequest,
}

impl ActionContext<'_> {
    pub(crate) fn repo_id(&self) -> &str {
        &self.request.repo_id
    }
}

/// Serialize a manifest for a result payload.
pub(crate) fn manifest_json(
    repo_id: &str,
    manifest: &Manifest,
) -> Result<Value, LifecycleError> {
    serde_json::to_value(manifest).map_err(|source| LifecycleError::Manifest {
        repo_id: repo_id.to_string(),
        source,
    })
}

/// Keep only the last `limit` bytes of tool output for error reporting.
pub(crate) fn output_tail(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.trim().to_string();
    }
    let start = text.len() - limit;
    // Avoid splitting a UTF-8 sequence
    let start = (start..text.len())
        .find(|i| text.is_char_boundary(*i))
        .unwrap_or(text.len());
    text[start..].trim().to_string()
}
