//! Run and stop: spawning, probing, supervision, and signal delivery.

use crate::prelude::{json, Sandbox, STUB_NPM};
use std::time::{Duration, Instant};

fn installed_app(sandbox: &Sandbox, package_json: &str) {
    let url = sandbox.init_origin("origin", &[("package.json", package_json)]);
    let mut request = sandbox.request("clone", "app");
    request["repoUrl"] = json!(url);
    assert_eq!(sandbox.invoke(&request)["success"], true);
    let install = sandbox.invoke(&sandbox.request("install", "app"));
    assert_eq!(install["success"], true, "install failed: {}", install);
}

fn wait_for_death(sandbox: &Sandbox, pid: i64) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while sandbox.pid_alive(pid) {
        assert!(Instant::now() < deadline, "pid {} still alive", pid);
        std::thread::sleep(Duration::from_millis(100));
    }
}

#[test]
fn background_run_then_stop_round_trip() {
    let sandbox = Sandbox::new();
    sandbox.stub_tool("npm", STUB_NPM);
    installed_app(
        &sandbox,
        r#"{"scripts": {"start": "server"}, "dependencies": {"express": "^4.0.0"}}"#,
    );

    let mut request = sandbox.request("run", "app");
    request["config"] = json!({"detached": true, "port": 4100});
    let result = sandbox.invoke(&request);
    assert_eq!(result["success"], true, "run failed: {}", result);

    let pid = result["processId"].as_i64().unwrap();
    assert!(sandbox.pid_alive(pid), "spawned process died immediately");

    let manifest = sandbox.manifest("app").unwrap();
    assert_eq!(manifest["status"], "running");
    assert_eq!(manifest["processId"].as_i64().unwrap(), pid);
    assert_eq!(manifest["command"], "npm run start");
    assert_eq!(manifest["port"], 4100);
    assert!(manifest["lastStarted"].as_u64().unwrap() > 0);

    let stop = sandbox.invoke(&sandbox.request("stop", "app"));
    assert_eq!(stop["success"], true, "stop failed: {}", stop);
    assert_eq!(stop["signaled"].as_i64().unwrap(), pid);

    wait_for_death(&sandbox, pid);
    let manifest = sandbox.manifest("app").unwrap();
    assert_eq!(manifest["status"], "stopped");
    assert!(manifest["lastStopped"].as_u64().unwrap() > 0);
}

#[test]
fn foreground_run_fails_when_the_script_exits_early() {
    let sandbox = Sandbox::new();
    sandbox.stub_tool("npm", STUB_NPM);
    installed_app(
        &sandbox,
        r#"{"scripts": {"flaky": "dies"}, "dependencies": {"express": "^4.0.0"}}"#,
    );

    let mut request = sandbox.request("run", "app");
    request["config"] = json!({"script": "flaky", "startupDelay": 2000});
    let result = sandbox.invoke(&request);

    assert_eq!(result["success"], false);
    assert!(result["error"].as_str().unwrap().contains("startup probe"));
    // The early exit is still recorded before the unit reports
    let manifest = sandbox.manifest("app").unwrap();
    assert_eq!(manifest["status"], "stopped");
    assert_eq!(manifest["exitCode"], 1);
}

#[test]
fn foreground_run_succeeds_when_the_script_completes_cleanly() {
    let sandbox = Sandbox::new();
    sandbox.stub_tool("npm", STUB_NPM);
    installed_app(
        &sandbox,
        r#"{"scripts": {"quick": "noop"}, "dependencies": {"express": "^4.0.0"}}"#,
    );

    let mut request = sandbox.request("run", "app");
    request["config"] = json!({"command": "quick", "startupDelay": 2000});
    let result = sandbox.invoke(&request);

    assert_eq!(result["success"], true, "run failed: {}", result);
    assert!(result["message"].as_str().unwrap().contains("ran to completion"));
    assert_eq!(sandbox.manifest("app").unwrap()["exitCode"], 0);
}

#[test]
fn supervised_exit_is_reconciled_into_the_manifest() {
    let sandbox = Sandbox::new();
    sandbox.stub_tool("npm", STUB_NPM);
    installed_app(
        &sandbox,
        r#"{"scripts": {"flaky": "dies"}, "dependencies": {"express": "^4.0.0"}}"#,
    );

    // The script outlives the probe window, so the unit reports success and
    // then stays resident; by the time it exits, the child's failure must be
    // durable.
    let mut request = sandbox.request("run", "app");
    request["config"] = json!({"script": "flaky", "startupDelay": 100});
    let result = sandbox.invoke(&request);

    assert_eq!(result["success"], true, "run failed: {}", result);
    let manifest = sandbox.manifest("app").unwrap();
    assert_eq!(manifest["status"], "stopped");
    assert_eq!(manifest["exitCode"], 1);
    assert!(manifest["lastStopped"].as_u64().unwrap() > 0);
}

#[test]
fn run_refuses_when_dependencies_are_declared_but_not_installed() {
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

    let result = sandbox.invoke(&sandbox.request("run", "app"));
    assert_eq!(result["success"], false);
    assert!(result["error"].as_str().unwrap().contains("not installed"));
    assert_eq!(sandbox.manifest("app").unwrap()["status"], "cloned");
}

#[test]
fn stop_is_safe_when_nothing_is_running() {
    let sandbox = Sandbox::new();

    // No workspace at all
    let result = sandbox.invoke(&sandbox.request("stop", "ghost"));
    assert_eq!(result["success"], true);
    assert!(result["message"].as_str().unwrap().contains("nothing to stop"));

    // Workspace exists but nothing was ever started
    sandbox.stub_tool("npm", STUB_NPM);
    let url = sandbox.init_origin("origin", &[("package.json", "{}")]);
    let mut request = sandbox.request("clone", "app");
    request["repoUrl"] = json!(url);
    assert_eq!(sandbox.invoke(&request)["success"], true);

    let result = sandbox.invoke(&sandbox.request("stop", "app"));
    assert_eq!(result["success"], true);
    assert!(result["message"].as_str().unwrap().contains("no-op"));
}
