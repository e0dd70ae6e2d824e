//! Unload: idempotent workspace destruction, including a running process.

use crate::prelude::{json, Sandbox, STUB_NPM};
use std::time::{Duration, Instant};

#[test]
fn unload_is_idempotent_on_an_absent_workspace() {
    let sandbox = Sandbox::new();

    for _ in 0..2 {
        let result = sandbox.invoke(&sandbox.request("unload", "ghost"));
        assert_eq!(result["success"], true);
        assert!(result["message"].as_str().unwrap().contains("no workspace"));
    }
}

#[test]
fn unload_removes_a_cloned_workspace() {
    let sandbox = Sandbox::new();
    let url = sandbox.init_origin("origin", &[("package.json", "{}")]);
    let mut request = sandbox.request("clone", "app");
    request["repoUrl"] = json!(url);
    assert_eq!(sandbox.invoke(&request)["success"], true);
    assert!(sandbox.workspace_path("app").exists());

    let result = sandbox.invoke(&sandbox.request("unload", "app"));
    assert_eq!(result["success"], true, "unload failed: {}", result);
    assert!(!sandbox.workspace_path("app").exists());
}

#[test]
fn unload_stops_a_running_process_before_removal() {
    let sandbox = Sandbox::new();
    sandbox.stub_tool("npm", STUB_NPM);
    let url = sandbox.init_origin(
        "origin",
        &[(
            "package.json",
            r#"{"scripts": {"start": "server"}, "dependencies": {"express": "^4.0.0"}}"#,
        )],
    );
    let mut request = sandbox.request("clone", "app");
    request["repoUrl"] = json!(url);
    assert_eq!(sandbox.invoke(&request)["success"], true);
    assert_eq!(sandbox.invoke(&sandbox.request("install", "app"))["success"], true);

    let mut run = sandbox.request("run", "app");
    run["config"] = json!({"detached": true});
    let result = sandbox.invoke(&run);
    assert_eq!(result["success"], true, "run failed: {}", result);
    let pid = result["processId"].as_i64().unwrap();
    assert!(sandbox.pid_alive(pid));

    let result = sandbox.invoke(&sandbox.request("unload", "app"));
    assert_eq!(result["success"], true, "unload failed: {}", result);
    assert!(!sandbox.workspace_path("app").exists());

    let deadline = Instant::now() + Duration::from_secs(10);
    while sandbox.pid_alive(pid) {
        assert!(Instant::now() < deadline, "pid {} survived unload", pid);
        std::thread::sleep(Duration::from_millis(100));
    }
}
