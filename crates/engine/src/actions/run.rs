// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run action: spawn the repository's run script as a supervised child

use super::{manifest_json, ActionContext, DEFAULT_STARTUP_DELAY_MS};
use crate::dispatch::{Followup, SupervisedChild};
use crate::error::LifecycleError;
use irl_adapters::process;
use irl_core::{Action, ActionResult};
use std::time::Duration;

pub(crate) async fn execute(
    ctx: &ActionContext<'_>,
) -> Result<(ActionResult, Option<Followup>), LifecycleError> {
    let config = &ctx.request.config;
    let mut manifest = ctx.store.load_manifest(ctx.repo_id())?;
    let workspace = ctx.store.workspace_path(ctx.repo_id());
    let descriptor = ctx.store.load_descriptor(ctx.repo_id())?;

    // Running without resolvable dependencies is a caller error, never
    // retried automatically
    if descriptor.has_dependencies() && !ctx.store.dependencies_installed(ctx.repo_id()) {
        return Err(LifecycleError::DependenciesMissing(ctx.repo_id().to_string()));
    }

    let script = descriptor
        .resolve_run_script(config.run_target())
        .ok_or_else(|| LifecycleError::NoRunScript {
            available: descriptor.script_names(),
        })?
        .to_string();

    let manager = manifest.package_manager;
    let command_line = format!("{} run {}", manager, script);

    let mut env = config.env.clone();
    if let Some(port) = config.port {
        env.insert("PORT".to_string(), port.to_string());
    }

    tracing::info!(
        repo_id = ctx.repo_id(),
        command = %command_line,
        detached = config.detached,
        "spawning run script"
    );

    let args = vec!["run".to_string(), script];
    let mut child = process::spawn_in_group(
        manager.command_name(),
        &args,
        &workspace,
        &env,
        config.stdio,
    )?;
    let pid = child
        .id()
        .ok_or_else(|| LifecycleError::ExternalToolFailure {
            tool: command_line.clone(),
            code: -1,
            detail: "child exited before its pid could be recorded".to_string(),
        })?;

    // status=running and processId are written at spawn time, before any
    // probing, so a crash of this unit still leaves the pid recoverable
    manifest.mark_running(pid, command_line.clone(), config.port);
    ctx.store.save_manifest(ctx.repo_id(), &manifest)?;

    if config.detached {
        // Background mode: report immediately, no liveness observation.
        // The child outlives this unit; only the manifest pid remains.
        let result = ActionResult::ok(Action::Run, ctx.repo_id())
            .with_field("processId", serde_json::json!(pid))
            .with_field("manifest", manifest_json(ctx.repo_id(), &manifest)?)
            .with_message(format!("started in background: {}", command_line));
        return Ok((result, None));
    }

    // Foreground-probe mode: a heuristic liveness check, not a readiness
    // check. Two outcomes: still alive after the delay (success) or exited
    // early (failure when non-zero).
    let delay = Duration::from_millis(config.startup_delay.unwrap_or(DEFAULT_STARTUP_DELAY_MS));
    match tokio::time::timeout(delay, child.wait()).await {
        Ok(Ok(status)) => {
            let (exit_code, exit_signal) = process::exit_telemetry(&status);
            manifest.mark_stopped(exit_code, exit_signal);
            ctx.store.save_manifest(ctx.repo_id(), &manifest)?;

            if status.success() {
                let result = ActionResult::ok(Action::Run, ctx.repo_id())
                    .with_field("manifest", manifest_json(ctx.repo_id(), &manifest)?)
                    .with_message(format!(
                        "{} ran to completion during the startup probe",
                        command_line
                    ));
                Ok((result, None))
            } else {
                Err(LifecycleError::ExternalToolFailure {
                    tool: command_line,
                    code: exit_code.unwrap_or(-1),
                    detail: "process exited during the startup probe".to_string(),
                })
            }
        }
        Ok(Err(io_err)) => Err(LifecycleError::Io(io_err)),
        Err(_alive_after_delay) => {
            let result = ActionResult::ok(Action::Run, ctx.repo_id())
                .with_field("processId", serde_json::json!(pid))
                .with_field("manifest", manifest_json(ctx.repo_id(), &manifest)?)
                .with_message(format!("started: {}", command_line));
            let supervised = SupervisedChild::new(child, ctx.store.clone(), ctx.repo_id());
            Ok((result, Some(Followup::Supervise(supervised))))
        }
    }
}
