//! Dependency installation with stubbed package managers.

use crate::prelude::{json, Sandbox, STUB_NPM, STUB_UNAVAILABLE};

fn cloned_app(sandbox: &Sandbox, files: &[(&str, &str)]) {
    let url = sandbox.init_origin("origin", files);
    let mut request = sandbox.request("clone", "app");
    request["repoUrl"] = json!(url);
    let result = sandbox.invoke(&request);
    assert_eq!(result["success"], true, "clone failed: {}", result);
}

#[test]
fn install_runs_the_detected_manager_and_creates_node_modules() {
    let sandbox = Sandbox::new();
    sandbox.stub_tool("npm", STUB_NPM);
    cloned_app(
        &sandbox,
        &[(
            "package.json",
            r#"{"dependencies": {"express": "^4.0.0"}}"#,
        )],
    );

    let result = sandbox.invoke(&sandbox.request("install", "app"));
    assert_eq!(result["success"], true, "install failed: {}", result);
    assert_eq!(result["packageManager"], "npm");
    assert!(sandbox.workspace_path("app").join("node_modules").is_dir());
    assert_eq!(sandbox.manifest("app").unwrap()["packageManager"], "npm");
}

#[test]
fn unavailable_detected_manager_falls_back_to_npm() {
    let sandbox = Sandbox::new();
    sandbox.stub_tool("npm", STUB_NPM);
    sandbox.stub_tool("pnpm", STUB_UNAVAILABLE);
    cloned_app(
        &sandbox,
        &[
            ("package.json", r#"{"dependencies": {"express": "^4.0.0"}}"#),
            ("pnpm-lock.yaml", ""),
        ],
    );
    // Detection at clone time saw the lock file
    assert_eq!(sandbox.manifest("app").unwrap()["packageManager"], "pnpm");

    let result = sandbox.invoke(&sandbox.request("install", "app"));
    assert_eq!(result["success"], true, "install failed: {}", result);
    // The manager actually used wins over the detection
    assert_eq!(result["packageManager"], "npm");
    assert_eq!(sandbox.manifest("app").unwrap()["packageManager"], "npm");
}

#[test]
fn install_on_an_unknown_repo_fails_cleanly() {
    let sandbox = Sandbox::new();
    sandbox.stub_tool("npm", STUB_NPM);

    let result = sandbox.invoke(&sandbox.request("install", "ghost"));
    assert_eq!(result["success"], false);
    assert!(result["error"].as_str().unwrap().contains("no workspace found"));
}
