// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git CLI operator: clone, pull, and read-only snapshot queries
//!
//! All operations run the system `git` binary with non-interactive
//! credential prompting disabled, so a hung auth prompt cannot stall the
//! execution unit past its timeout.

use crate::subprocess::{
    run_with_timeout, SubprocessError, GIT_CLONE_TIMEOUT, GIT_PULL_TIMEOUT, GIT_QUERY_TIMEOUT,
};
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

/// Hosts for which a credential token is injected into https clone URLs.
const TOKEN_HOSTS: [&str; 2] = ["github.com", "gitlab.com"];

#[derive(Debug, Error)]
pub enum GitError {
    #[error(transparent)]
    Subprocess(#[from] SubprocessError),
    #[error("git {op} failed: {stderr}")]
    CommandFailed { op: &'static str, stderr: String },
}

/// Read-only view of a working tree for the `status` action.
#[derive(Debug, Clone)]
pub struct GitSnapshot {
    pub dirty: bool,
    pub branch: String,
    pub last_commit: String,
}

/// Wraps clone/pull with shallow-depth and branch selection, plus
/// credential injection for private sources.
#[derive(Debug, Clone, Default)]
pub struct GitOperator {
    token: Option<String>,
}

impl GitOperator {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// Read the credential token from the host environment
    /// (`GITHUB_TOKEN`, falling back to `GIT_TOKEN`). Absent token means
    /// an unauthenticated clone is attempted.
    pub fn from_env() -> Self {
        let token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GIT_TOKEN"))
            .ok()
            .filter(|t| !t.is_empty());
        Self { token }
    }

    /// Shallow-clone `repo_url` into `dest`.
    ///
    /// Returns whether credential injection was used. The tokenized URL is
    /// passed to git only; callers persist the original URL.
    pub async fn clone(
        &self,
        repo_url: &str,
        dest: &Path,
        branch: &str,
        depth: u32,
    ) -> Result<bool, GitError> {
        let clone_url = self
            .token
            .as_deref()
            .and_then(|token| inject_token(repo_url, token));
        let authenticated = clone_url.is_some();

        tracing::info!(
            repo_url,
            dest = %dest.display(),
            branch,
            depth,
            authenticated,
            "cloning repository"
        );

        let mut cmd = Command::new("git");
        cmd.arg("clone")
            .arg("--depth")
            .arg(depth.to_string())
            .arg("--branch")
            .arg(branch)
            .arg("--single-branch")
            .arg(clone_url.as_deref().unwrap_or(repo_url))
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0");

        let output = run_with_timeout(cmd, GIT_CLONE_TIMEOUT, "git clone").await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                op: "clone",
                stderr: self.scrub(&String::from_utf8_lossy(&output.stderr)),
            });
        }
        Ok(authenticated)
    }

    /// Pull from the existing remote of `workdir`.
    ///
    /// Returns the trimmed pull summary from stdout.
    pub async fn pull(&self, workdir: &Path) -> Result<String, GitError> {
        let mut cmd = Command::new("git");
        cmd.arg("pull")
            .current_dir(workdir)
            .env("GIT_TERMINAL_PROMPT", "0");

        let output = run_with_timeout(cmd, GIT_PULL_TIMEOUT, "git pull").await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                op: "pull",
                stderr: self.scrub(&String::from_utf8_lossy(&output.stderr)),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Gather dirty state, current branch, and last commit summary.
    pub async fn snapshot(&self, workdir: &Path) -> Result<GitSnapshot, GitError> {
        let status = self
            .query(workdir, &["status", "--porcelain"], "git status")
            .await?;
        let branch = self
            .query(workdir, &["rev-parse", "--abbrev-ref", "HEAD"], "git rev-parse")
            .await?;
        let last_commit = self
            .query(workdir, &["log", "-1", "--format=%h %s"], "git log")
            .await?;

        Ok(GitSnapshot {
            dirty: !status.is_empty(),
            branch,
            last_commit,
        })
    }

    async fn query(
        &self,
        workdir: &Path,
        args: &[&str],
        description: &str,
    ) -> Result<String, GitError> {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(workdir)
            .env("GIT_TERMINAL_PROMPT", "0");

        let output = run_with_timeout(cmd, GIT_QUERY_TIMEOUT, description).await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                op: "query",
                stderr: self.scrub(&String::from_utf8_lossy(&output.stderr)),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Redact the credential token from tool output before it reaches
    /// logs or result messages.
    fn scrub(&self, text: &str) -> String {
        match self.token.as_deref() {
            Some(token) if !token.is_empty() => text.replace(token, "***"),
            _ => text.to_string(),
        }
    }
}

/// Inject a credential token into an https URL for a known host.
///
/// Any other scheme or host is left untouched (ssh URLs authenticate via
/// keys; unknown hosts should never see our token).
fn inject_token(repo_url: &str, token: &str) -> Option<String> {
    let rest = repo_url.strip_prefix("https://")?;
    if TOKEN_HOSTS.iter().any(|host| {
        rest.starts_with(host)
            && rest[host.len()..]
                .chars()
                .next()
                .map_or(true, |c| c == '/' || c == ':')
    }) {
        Some(format!("https://{}@{}", token, rest))
    } else {
        None
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
