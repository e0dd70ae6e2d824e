// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed projection of a repository's `package.json`
//!
//! Only the fields the lifecycle manager cares about: declared scripts
//! (run-target resolution), dependencies (installed-deps gate), and enough
//! dependency names for a best-effort framework classification.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Run-target resolution priority after any explicit target.
const DEFAULT_SCRIPT_PRIORITY: [&str; 3] = ["start", "dev", "serve"];

/// Framework classification table, most specific first (a Next.js app also
/// depends on react; a Nuxt app also depends on vue).
const FRAMEWORK_MARKERS: [(&str, &str); 10] = [
    ("next", "nextjs"),
    ("nuxt", "nuxt"),
    ("@angular/core", "angular"),
    ("@nestjs/core", "nestjs"),
    ("svelte", "svelte"),
    ("vue", "vue"),
    ("react", "react"),
    ("fastify", "fastify"),
    ("koa", "koa"),
    ("express", "express"),
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageDescriptor {
    pub name: Option<String>,
    pub scripts: BTreeMap<String, String>,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageDescriptor {
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Whether the descriptor declares any runtime dependencies.
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    /// Resolve the script to run: explicit target first (only when it names
    /// a declared script), then `start`, `dev`, `serve`.
    pub fn resolve_run_script(&self, explicit: Option<&str>) -> Option<&str> {
        explicit
            .into_iter()
            .chain(DEFAULT_SCRIPT_PRIORITY)
            .find_map(|name| self.scripts.get_key_value(name).map(|(k, _)| k.as_str()))
    }

    /// Declared script names, for `NoRunScript` diagnostics.
    pub fn script_names(&self) -> Vec<String> {
        self.scripts.keys().cloned().collect()
    }

    /// Best-effort framework classification from dependency names.
    pub fn detect_framework(&self) -> Option<String> {
        FRAMEWORK_MARKERS
            .iter()
            .find(|(marker, _)| {
                self.dependencies.contains_key(*marker)
                    || self.dev_dependencies.contains_key(*marker)
            })
            .map(|(_, framework)| (*framework).to_string())
    }
}

#[cfg(test)]
#[path = "package_descriptor_tests.rs"]
mod tests;
