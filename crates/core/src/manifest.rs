// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-workspace lifecycle manifest

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Manifest file name, relative to the workspace directory.
pub const MANIFEST_FILE: &str = ".isolation-manifest.json";

/// Current time as epoch milliseconds.
pub fn epoch_ms_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Lifecycle phase of a workspace.
///
/// "Absent" is represented by the absence of a workspace/manifest and is
/// never written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    Cloned,
    Running,
    Stopped,
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleStatus::Cloned => write!(f, "cloned"),
            LifecycleStatus::Running => write!(f, "running"),
            LifecycleStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Executable name on PATH.
    pub fn command_name(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command_name())
    }
}

/// The single durable record of a workspace's lifecycle state.
///
/// Co-located inside the workspace as [`MANIFEST_FILE`] and rewritten
/// wholesale (never patched) on every state-changing action. Invariant:
/// `status == Running` implies `process_id.is_some()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub repo_id: String,
    /// Original source URL, always stored untokenized.
    pub repo_url: String,
    /// Epoch ms when the clone completed.
    pub cloned_at: u64,
    #[serde(default)]
    pub last_updated: Option<u64>,
    pub branch: String,
    pub depth: u32,
    /// Marks the workspace as manager-owned. Always true.
    pub isolated: bool,
    /// Whether credential injection was used for the clone.
    #[serde(default)]
    pub authenticated: bool,
    pub package_manager: PackageManager,
    /// Best-effort static classification from the package descriptor.
    #[serde(default)]
    pub framework: Option<String>,
    pub status: LifecycleStatus,
    /// OS process id of the running instance. The only durable handle a
    /// later invocation has on the child process.
    #[serde(default)]
    pub process_id: Option<u32>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub last_started: Option<u64>,
    #[serde(default)]
    pub last_stopped: Option<u64>,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub exit_signal: Option<String>,
}

impl Manifest {
    /// Initial manifest written right after a successful clone.
    #[allow(clippy::too_many_arguments)]
    pub fn cloned(
        repo_id: impl Into<String>,
        repo_url: impl Into<String>,
        branch: impl Into<String>,
        depth: u32,
        authenticated: bool,
        package_manager: PackageManager,
        framework: Option<String>,
    ) -> Self {
        Self {
            repo_id: repo_id.into(),
            repo_url: repo_url.into(),
            cloned_at: epoch_ms_now(),
            last_updated: None,
            branch: branch.into(),
            depth,
            isolated: true,
            authenticated,
            package_manager,
            framework,
            status: LifecycleStatus::Cloned,
            process_id: None,
            command: None,
            port: None,
            last_started: None,
            last_stopped: None,
            exit_code: None,
            exit_signal: None,
        }
    }

    /// Transition to Running at spawn time.
    pub fn mark_running(&mut self, process_id: u32, command: String, port: Option<u16>) {
        self.status = LifecycleStatus::Running;
        self.process_id = Some(process_id);
        self.command = Some(command);
        self.port = port;
        self.last_started = Some(epoch_ms_now());
        self.exit_code = None;
        self.exit_signal = None;
    }

    /// Transition to Stopped, recording exit telemetry when known.
    pub fn mark_stopped(&mut self, exit_code: Option<i32>, exit_signal: Option<String>) {
        self.status = LifecycleStatus::Stopped;
        self.process_id = None;
        self.last_stopped = Some(epoch_ms_now());
        self.exit_code = exit_code;
        self.exit_signal = exit_signal;
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
