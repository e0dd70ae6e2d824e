// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace store: directory-per-repository layout and manifest I/O
//!
//! The manifest is the read-modify-write primitive for every state
//! transition: handlers load it, decide the new state, and write it back
//! wholesale before reporting.

use crate::error::LifecycleError;
use irl_core::{Manifest, PackageDescriptor, MANIFEST_FILE};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    root: PathBuf,
}

impl WorkspaceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reject repo ids that would escape the workspace root.
    pub fn validate_repo_id(repo_id: &str) -> Result<(), LifecycleError> {
        let ok = !repo_id.is_empty()
            && repo_id != "."
            && repo_id != ".."
            && !repo_id.contains('/')
            && !repo_id.contains('\\')
            && !repo_id.contains('\0');
        if ok {
            Ok(())
        } else {
            Err(LifecycleError::InvalidRepoId(repo_id.to_string()))
        }
    }

    pub fn workspace_path(&self, repo_id: &str) -> PathBuf {
        self.root.join(repo_id)
    }

    pub fn exists(&self, repo_id: &str) -> bool {
        self.workspace_path(repo_id).is_dir()
    }

    pub fn ensure_root(&self) -> Result<(), LifecycleError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Recursively and forcibly remove the workspace. A no-op when absent.
    pub async fn remove_workspace(&self, repo_id: &str) -> Result<(), LifecycleError> {
        let path = self.workspace_path(repo_id);
        if path.exists() {
            tokio::fs::remove_dir_all(&path).await?;
        }
        Ok(())
    }

    pub fn manifest_path(&self, repo_id: &str) -> PathBuf {
        self.workspace_path(repo_id).join(MANIFEST_FILE)
    }

    /// Load the manifest, treating absence as `NotFound`.
    pub fn load_manifest(&self, repo_id: &str) -> Result<Manifest, LifecycleError> {
        self.try_load_manifest(repo_id)?
            .ok_or_else(|| LifecycleError::NotFound(repo_id.to_string()))
    }

    /// Load the manifest if one exists.
    pub fn try_load_manifest(&self, repo_id: &str) -> Result<Option<Manifest>, LifecycleError> {
        let path = self.manifest_path(repo_id);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        let manifest =
            serde_json::from_str(&contents).map_err(|source| LifecycleError::Manifest {
                repo_id: repo_id.to_string(),
                source,
            })?;
        Ok(Some(manifest))
    }

    /// Rewrite the manifest wholesale.
    pub fn save_manifest(&self, repo_id: &str, manifest: &Manifest) -> Result<(), LifecycleError> {
        let contents =
            serde_json::to_string_pretty(manifest).map_err(|source| LifecycleError::Manifest {
                repo_id: repo_id.to_string(),
                source,
            })?;
        fs::write(self.manifest_path(repo_id), contents)?;
        Ok(())
    }

    /// Installed-dependencies marker: a `node_modules` directory.
    pub fn dependencies_installed(&self, repo_id: &str) -> bool {
        self.workspace_path(repo_id).join("node_modules").is_dir()
    }

    /// Per-workspace cache directory for a package manager, so concurrent
    /// installs for different repositories never share a global cache.
    pub fn cache_dir(&self, repo_id: &str, manager: &str) -> PathBuf {
        self.workspace_path(repo_id).join(".cache").join(manager)
    }

    /// Load the repository's package descriptor; a missing `package.json`
    /// yields the empty descriptor.
    pub fn load_descriptor(&self, repo_id: &str) -> Result<PackageDescriptor, LifecycleError> {
        let path = self.workspace_path(repo_id).join("package.json");
        if !path.exists() {
            return Ok(PackageDescriptor::default());
        }
        let contents = fs::read_to_string(&path)?;
        PackageDescriptor::parse(&contents).map_err(|source| LifecycleError::Manifest {
            repo_id: repo_id.to_string(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
