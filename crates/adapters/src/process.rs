// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child process spawning and PID-based control
//!
//! Children are spawned into their own process group so a later, unrelated
//! invocation can regain control of the whole tree from nothing but the
//! process id recorded in the manifest.

use irl_core::StdioMode;
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::{Child, Command};

/// Poll interval while waiting out the stop grace period.
pub const STOP_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to signal process {pid}: {errno}")]
    Signal { pid: u32, errno: Errno },
}

/// Spawn `program args..` under `cwd` in its own process group.
///
/// The child inherits the host environment with `env` merged over it. The
/// returned handle is not kill-on-drop: the child intentionally outlives
/// the spawning execution unit in detached mode.
pub fn spawn_in_group(
    program: &str,
    args: &[String],
    cwd: &Path,
    env: &HashMap<String, String>,
    stdio: StdioMode,
) -> Result<Child, SpawnError> {
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(cwd).envs(env).process_group(0);

    match stdio {
        StdioMode::Ignore => {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }
        StdioMode::Inherit => {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }
    }

    cmd.spawn().map_err(|source| SpawnError::Spawn {
        command: format!("{} {}", program, args.join(" ")),
        source,
    })
}

/// Whether a process with this id exists (signal 0 probe).
pub fn is_alive(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// Send a signal to the process group led by `pid`, falling back to the
/// process itself if no group exists. "No such process" is swallowed: the
/// goal (no running process) is already satisfied.
pub fn signal_process(pid: u32, signal: Signal) -> Result<(), SpawnError> {
    let group = Pid::from_raw(-(pid as i32));
    match kill(group, signal) {
        Ok(()) => Ok(()),
        Err(Errno::ESRCH) => match kill(Pid::from_raw(pid as i32), signal) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(errno) => Err(SpawnError::Signal { pid, errno }),
        },
        Err(errno) => Err(SpawnError::Signal { pid, errno }),
    }
}

/// Send SIGTERM to the process group led by `pid`.
pub fn terminate(pid: u32) -> Result<(), SpawnError> {
    signal_process(pid, Signal::SIGTERM)
}

/// Graceful termination: SIGTERM, then SIGKILL after the grace period if
/// the process is still alive.
///
/// Returns true if the process was gone without needing SIGKILL.
pub async fn terminate_with_grace(pid: u32, grace: Duration) -> Result<bool, SpawnError> {
    signal_process(pid, Signal::SIGTERM)?;
    wait_then_kill(pid, grace).await
}

/// Wait out a grace period for a process already sent SIGTERM, polling so
/// well-behaved children release the caller early; SIGKILL anything that
/// survives the full period.
///
/// Returns true if the process was gone without needing SIGKILL.
pub async fn wait_then_kill(pid: u32, grace: Duration) -> Result<bool, SpawnError> {
    let deadline = tokio::time::Instant::now() + grace;
    while tokio::time::Instant::now() < deadline {
        if !is_alive(pid) {
            return Ok(true);
        }
        tokio::time::sleep(STOP_POLL_INTERVAL).await;
    }

    if is_alive(pid) {
        tracing::warn!(pid, "process survived grace period, sending SIGKILL");
        signal_process(pid, Signal::SIGKILL)?;
        return Ok(false);
    }
    Ok(true)
}

/// Exit code and signal name from a child's exit status.
pub fn exit_telemetry(status: &ExitStatus) -> (Option<i32>, Option<String>) {
    let signal_name = status.signal().map(|raw| {
        Signal::try_from(raw)
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|_| format!("SIG{}", raw))
    });
    (status.code(), signal_name)
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
