// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action dispatcher
//!
//! One request in, one structured result out. Every failure is caught here
//! and folded into a failure result; nothing propagates as an unstructured
//! fault to the execution unit.

use crate::actions::{self, ActionContext};
use crate::error::LifecycleError;
use crate::workspace::WorkspaceStore;
use irl_adapters::subprocess::STOP_GRACE;
use irl_adapters::{process, GitOperator};
use irl_core::{Action, ActionRequest, ActionResult};
use tokio::process::Child;

/// The result of one dispatched action, plus any work that must happen
/// after the result has been reported.
pub struct DispatchOutcome {
    pub result: ActionResult,
    pub followup: Option<Followup>,
}

impl DispatchOutcome {
    fn done(result: ActionResult) -> Self {
        Self {
            result,
            followup: None,
        }
    }
}

/// Post-report work. The execution unit runs this after emitting its one
/// result message; it is the only state that outlives reporting.
pub enum Followup {
    /// Stay resident until the spawned child exits, then reconcile the
    /// manifest with its exit telemetry.
    Supervise(SupervisedChild),
    /// Wait out the stop grace period, SIGKILL if the process survives it.
    GraceKill { pid: u32 },
}

impl Followup {
    pub async fn run(self) {
        match self {
            Followup::Supervise(supervised) => supervised.supervise().await,
            Followup::GraceKill { pid } => {
                if let Err(err) = process::wait_then_kill(pid, STOP_GRACE).await {
                    tracing::warn!(pid, error = %err, "grace-period kill failed");
                }
            }
        }
    }
}

/// Exit handler for a foreground-spawned child.
///
/// Held by the spawning execution unit only: a later invocation cannot
/// reach this and must act on the pid recorded in the manifest instead.
pub struct SupervisedChild {
    child: Child,
    store: WorkspaceStore,
    repo_id: String,
}

impl SupervisedChild {
    pub fn new(child: Child, store: WorkspaceStore, repo_id: impl Into<String>) -> Self {
        Self {
            child,
            store,
            repo_id: repo_id.into(),
        }
    }

    /// Wait for the child to terminate, then rewrite the manifest to
    /// stopped with its exit telemetry. Best-effort: the workspace may
    /// have been unloaded in the meantime.
    pub async fn supervise(mut self) {
        let status = match self.child.wait().await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(repo_id = %self.repo_id, error = %err, "child wait failed");
                return;
            }
        };

        let (exit_code, exit_signal) = process::exit_telemetry(&status);
        tracing::info!(
            repo_id = %self.repo_id,
            exit_code,
            exit_signal,
            "supervised process exited"
        );

        match self.store.try_load_manifest(&self.repo_id) {
            Ok(Some(mut manifest)) => {
                manifest.mark_stopped(exit_code, exit_signal);
                if let Err(err) = self.store.save_manifest(&self.repo_id, &manifest) {
                    tracing::warn!(
                        repo_id = %self.repo_id,
                        error = %err,
                        "failed to reconcile manifest after exit"
                    );
                }
            }
            Ok(None) => {
                tracing::debug!(repo_id = %self.repo_id, "manifest gone, nothing to reconcile");
            }
            Err(err) => {
                tracing::warn!(repo_id = %self.repo_id, error = %err, "manifest unreadable on exit");
            }
        }
    }
}

/// Perform exactly one lifecycle action.
pub async fn dispatch(request: &ActionRequest) -> DispatchOutcome {
    let span = tracing::info_span!(
        "action",
        action = request.action.name(),
        repo_id = %request.repo_id
    );
    let _guard = span.enter();

    let start = std::time::Instant::now();
    let outcome = dispatch_inner(request).await;
    let elapsed = start.elapsed();

    match outcome {
        Ok(outcome) => {
            tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "completed");
            outcome
        }
        Err(err) => {
            tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %err,
                "failed"
            );
            DispatchOutcome::done(ActionResult::failure(
                request.action,
                &request.repo_id,
                &err,
            ))
        }
    }
}

async fn dispatch_inner(request: &ActionRequest) -> Result<DispatchOutcome, LifecycleError> {
    WorkspaceStore::validate_repo_id(&request.repo_id)?;

    let ctx = ActionContext {
        store: WorkspaceStore::new(&request.workspace_dir),
        git: GitOperator::from_env(),
        request,
    };

    match request.action {
        Action::Clone => actions::clone::execute(&ctx).await.map(DispatchOutcome::done),
        Action::Update => actions::update::execute(&ctx).await.map(DispatchOutcome::done),
        Action::Unload => actions::unload::execute(&ctx).await.map(DispatchOutcome::done),
        Action::Install => actions::install::execute(&ctx).await.map(DispatchOutcome::done),
        Action::Status => actions::status::execute(&ctx).await.map(DispatchOutcome::done),
        Action::Run => actions::run::execute(&ctx)
            .await
            .map(|(result, followup)| DispatchOutcome { result, followup }),
        Action::Stop => actions::stop::execute(&ctx)
            .await
            .map(|(result, followup)| DispatchOutcome { result, followup }),
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
