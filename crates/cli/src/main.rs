// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! irl - Isolated repo lifecycle execution unit
//!
//! Each invocation is one stateless execution unit: it consumes a single
//! JSON action request, performs exactly one lifecycle action, emits
//! exactly one JSON result on stdout, and exits. All cross-invocation
//! state lives in the per-workspace manifest and in OS process ids.
//!
//! Logs go to stderr so stdout carries nothing but the result message.

use anyhow::{Context, Result};
use clap::Parser;
use irl_core::ActionRequest;
use irl_engine::dispatch;
use serde_json::{json, Value};
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "irl",
    version,
    about = "Isolated repo lifecycle manager - performs one action per invocation"
)]
struct Cli {
    /// Path to the JSON action request; "-" or omitted reads stdin
    request: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_env("IRL_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let input = read_request(cli.request.as_deref())?;

    let request: ActionRequest = match serde_json::from_str(&input) {
        Ok(request) => request,
        Err(err) => {
            // Even an unparseable request yields one structured failure
            // message, never an unstructured fault
            report(&invalid_request_result(&input, &err))?;
            std::process::exit(1);
        }
    };

    let outcome = dispatch(&request).await;
    let success = outcome.result.success;
    report(&serde_json::to_value(&outcome.result)?)?;

    // Post-report work: stay resident for a foreground child's exit
    // handler, or wait out a stop grace period. Cross-action state is
    // already durable in the manifest by this point.
    if let Some(followup) = outcome.followup {
        followup.run().await;
    }

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

fn read_request(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display())),
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read request from stdin")?;
            Ok(input)
        }
    }
}

/// Emit exactly one result message on stdout.
fn report(result: &Value) -> Result<()> {
    let mut stdout = std::io::stdout();
    serde_json::to_writer(&mut stdout, result)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}

/// Best-effort failure record for a request that did not parse: echo back
/// whatever action/repoId fields were present.
fn invalid_request_result(input: &str, err: &serde_json::Error) -> Value {
    let raw: Value = serde_json::from_str(input).unwrap_or_else(|_| json!({}));
    json!({
        "success": false,
        "action": raw.get("action").cloned().unwrap_or_else(|| json!("unknown")),
        "repoId": raw.get("repoId").cloned().unwrap_or_else(|| json!("unknown")),
        "error": format!("invalid request: {}", err),
    })
}
