//! Request boundary: every input, parseable or not, yields one structured
//! result on stdout.

use crate::prelude::{json, Sandbox};

#[test]
fn malformed_json_yields_a_structured_failure_and_exit_one() {
    let sandbox = Sandbox::new();
    let output = sandbox.raw_invoke(&json!("this is not a request"));

    assert_eq!(output.status.code(), Some(1));
    let line = String::from_utf8_lossy(&output.stdout);
    let result: serde_json::Value = serde_json::from_str(line.lines().next().unwrap()).unwrap();
    assert_eq!(result["success"], false);
    assert_eq!(result["action"], "unknown");
    assert_eq!(result["repoId"], "unknown");
    assert!(result["error"].as_str().unwrap().contains("invalid request"));
}

#[test]
fn unknown_action_is_echoed_back_in_the_failure() {
    let sandbox = Sandbox::new();
    let request = json!({
        "action": "explode",
        "repoId": "r1",
        "workspaceDir": sandbox.workspaces(),
    });
    let output = sandbox.raw_invoke(&request);

    assert_eq!(output.status.code(), Some(1));
    let line = String::from_utf8_lossy(&output.stdout);
    let result: serde_json::Value = serde_json::from_str(line.lines().next().unwrap()).unwrap();
    assert_eq!(result["success"], false);
    assert_eq!(result["action"], "explode");
    assert_eq!(result["repoId"], "r1");
}

#[test]
fn repo_id_with_path_traversal_is_rejected() {
    let sandbox = Sandbox::new();
    let result = sandbox.invoke(&sandbox.request("status", "../outside"));

    assert_eq!(result["success"], false);
    assert!(result["error"].as_str().unwrap().contains("invalid repo id"));
}

#[test]
fn logs_never_contaminate_the_result_stream() {
    let sandbox = Sandbox::new();
    let mut request = sandbox.request("status", "ghost");
    request["workspaceDir"] = json!(sandbox.workspaces());

    let output = sandbox.raw_invoke(&request);
    let stdout = String::from_utf8_lossy(&output.stdout);
    // Exactly one line, and it parses as a result record
    assert_eq!(stdout.lines().count(), 1);
    let result: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(result["action"], "status");
}
