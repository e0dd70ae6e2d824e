//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for driving the irl binary: a sandbox with a
//! workspace root, local git origins, and stub package-manager executables
//! prepended to PATH.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub use serde_json::{json, Value};

/// A stub npm that can probe, install (creating the node_modules marker),
/// and run the scripts the specs rely on.
pub const STUB_NPM: &str = r#"#!/bin/sh
case "$1" in
    --version) echo "10.0.0"; exit 0 ;;
    install|ci) mkdir -p node_modules; exit 0 ;;
    run)
        case "$2" in
            start) exec sleep 30 ;;
            quick) exit 0 ;;
            flaky) sleep 0.3; exit 1 ;;
        esac
        exit 1 ;;
esac
exit 1
"#;

/// A stub tool that fails its availability probe.
pub const STUB_UNAVAILABLE: &str = "#!/bin/sh\nexit 127\n";

pub struct Sandbox {
    temp: TempDir,
    stub_bin: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let stub_bin = temp.path().join("stub-bin");
        std::fs::create_dir_all(&stub_bin).unwrap();
        Self { temp, stub_bin }
    }

    /// Workspace root passed as `workspaceDir` in requests.
    pub fn workspaces(&self) -> PathBuf {
        self.temp.path().join("workspaces")
    }

    /// Base request record for an action against this sandbox.
    pub fn request(&self, action: &str, repo_id: &str) -> Value {
        json!({
            "action": action,
            "repoId": repo_id,
            "workspaceDir": self.workspaces(),
        })
    }

    /// Install an executable stub tool ahead of the real PATH.
    pub fn stub_tool(&self, name: &str, script: &str) {
        let path = self.stub_bin.join(name);
        std::fs::write(&path, script).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    /// Create a local git origin with one commit on `main`; returns its
    /// file:// URL.
    pub fn init_origin(&self, name: &str, files: &[(&str, &str)]) -> String {
        let repo = self.temp.path().join(name);
        std::fs::create_dir_all(&repo).unwrap();
        git(&repo, &["init", "-b", "main"]);
        for (file, contents) in files {
            std::fs::write(repo.join(file), contents).unwrap();
        }
        git(&repo, &["add", "."]);
        git(&repo, &["commit", "--allow-empty", "-m", "initial commit"]);
        format!("file://{}", repo.display())
    }

    /// Create a branch with an extra file in an existing origin.
    pub fn add_branch(&self, name: &str, branch: &str, file: &str, contents: &str) {
        let repo = self.temp.path().join(name);
        git(&repo, &["checkout", "-b", branch]);
        std::fs::write(repo.join(file), contents).unwrap();
        git(&repo, &["add", "."]);
        git(&repo, &["commit", "-m", "branch commit"]);
        git(&repo, &["checkout", "main"]);
    }

    /// Run one execution unit: request in on stdin, parsed result out.
    pub fn invoke(&self, request: &Value) -> Value {
        let output = self.raw_invoke(request);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout.lines().next().unwrap_or_default();
        serde_json::from_str(line).unwrap_or_else(|_| {
            panic!(
                "no result JSON on stdout; stdout={:?} stderr={:?}",
                stdout,
                String::from_utf8_lossy(&output.stderr)
            )
        })
    }

    pub fn raw_invoke(&self, request: &Value) -> std::process::Output {
        let path = format!(
            "{}:{}",
            self.stub_bin.display(),
            std::env::var("PATH").unwrap_or_default()
        );
        assert_cmd::Command::cargo_bin("irl")
            .unwrap()
            .env("PATH", path)
            .env("IRL_LOG", "warn")
            .write_stdin(request.to_string())
            .output()
            .unwrap()
    }

    pub fn workspace_path(&self, repo_id: &str) -> PathBuf {
        self.workspaces().join(repo_id)
    }

    /// Read the persisted manifest, if any.
    pub fn manifest(&self, repo_id: &str) -> Option<Value> {
        let path = self.workspace_path(repo_id).join(".isolation-manifest.json");
        let contents = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Whether a pid (from a result payload) still exists.
    pub fn pid_alive(&self, pid: i64) -> bool {
        std::process::Command::new("kill")
            .args(["-0", &pid.to_string()])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

fn git(dir: &Path, args: &[&str]) {
    let output = std::process::Command::new("git")
        .args(["-c", "user.email=spec@example.com", "-c", "user.name=spec"])
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}
