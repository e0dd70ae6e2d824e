// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action request/result boundary types
//!
//! One request record in, one result record out, per execution unit.

use crate::manifest::PackageManager;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// The closed set of lifecycle actions.
///
/// A fixed enumeration rather than a free-form action string: dispatch is
/// exhaustive at compile time and there is no "unknown action" path past
/// request parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Clone,
    Update,
    Unload,
    Install,
    Status,
    Run,
    Stop,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Clone => "clone",
            Action::Update => "update",
            Action::Unload => "unload",
            Action::Install => "install",
            Action::Status => "status",
            Action::Run => "run",
            Action::Stop => "stop",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Child process stdio mode for `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StdioMode {
    /// Discard child output (default; keeps the reporting stream clean and
    /// lets the execution unit exit without dangling pipes).
    #[default]
    Ignore,
    /// Inherit the execution unit's stdio.
    Inherit,
}

/// Recognized per-action options, all optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfig {
    /// Clone branch (default "main").
    #[serde(default)]
    pub branch: Option<String>,
    /// Clone depth (default 1).
    #[serde(default)]
    pub depth: Option<u32>,
    /// Preferred package manager; availability still wins.
    #[serde(default)]
    pub package_manager: Option<PackageManager>,
    /// Strip dev dependencies on install (clean/frozen install).
    #[serde(default)]
    pub production: bool,
    /// Explicit run target (must name a declared script).
    #[serde(default)]
    pub command: Option<String>,
    /// Alias for `command`.
    #[serde(default)]
    pub script: Option<String>,
    /// Port to expose to the child via the PORT environment variable.
    #[serde(default)]
    pub port: Option<u16>,
    /// Extra environment variables merged over the host environment.
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Background run mode: report immediately after spawn.
    #[serde(default, alias = "background")]
    pub detached: bool,
    /// Child I/O mode.
    #[serde(default)]
    pub stdio: StdioMode,
    /// Foreground-probe wait in milliseconds (default 3000).
    #[serde(default)]
    pub startup_delay: Option<u64>,
}

impl ActionConfig {
    /// Explicit run target: `command` wins over `script`.
    pub fn run_target(&self) -> Option<&str> {
        self.command.as_deref().or(self.script.as_deref())
    }
}

/// One invocation record, consumed from the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub action: Action,
    pub repo_id: String,
    #[serde(default)]
    pub repo_url: Option<String>,
    pub workspace_dir: PathBuf,
    #[serde(default)]
    pub config: ActionConfig,
}

/// One result record, produced to the orchestrator.
///
/// Action-specific payload fields are flattened into the top-level object,
/// matching the documented wire shape
/// `{success, action, repoId, <payload>, message}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub success: bool,
    pub action: Action,
    pub repo_id: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    pub fn ok(action: Action, repo_id: impl Into<String>) -> Self {
        Self {
            success: true,
            action,
            repo_id: repo_id.into(),
            payload: Map::new(),
            message: None,
            error: None,
        }
    }

    pub fn failure(action: Action, repo_id: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            success: false,
            action,
            repo_id: repo_id.into(),
            payload: Map::new(),
            message: None,
            error: Some(error.to_string()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
