// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for lifecycle actions
//!
//! Every variant is caught at the dispatch boundary and converted into a
//! structured failure result; nothing escapes as an unstructured fault.

use irl_adapters::{GitError, SpawnError, SubprocessError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("no workspace found for repo '{0}'")]
    NotFound(String),
    #[error("invalid repo id '{0}': must be a single path component")]
    InvalidRepoId(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("dependencies declared but not installed for repo '{0}'; run install first")]
    DependenciesMissing(String),
    #[error("no runnable script found; declared scripts: [{}]", available.join(", "))]
    NoRunScript { available: Vec<String> },
    #[error("{tool} exited with code {code}: {detail}")]
    ExternalToolFailure {
        tool: String,
        code: i32,
        detail: String,
    },
    #[error(transparent)]
    Git(#[from] GitError),
    #[error(transparent)]
    Subprocess(#[from] SubprocessError),
    #[error(transparent)]
    Spawn(#[from] SpawnError),
    #[error("manifest for repo '{repo_id}' is unreadable: {source}")]
    Manifest {
        repo_id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
