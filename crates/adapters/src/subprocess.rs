// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers

use std::process::Output;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Default timeout for `git clone`.
pub const GIT_CLONE_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for `git pull`.
pub const GIT_PULL_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for read-only git queries (status/branch/log).
pub const GIT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for package-manager availability probes.
pub const TOOL_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for dependency installs. Installs are the slowest and
/// most variable step, so the bound is generous but finite.
pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// Grace period between SIGTERM and SIGKILL when stopping a child.
pub const STOP_GRACE: Duration = Duration::from_secs(5);

/// Errors from bounded subprocess execution.
#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("{description} failed: {source}")]
    Io {
        description: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{description} timed out after {}s", timeout.as_secs())]
    Timeout {
        description: String,
        timeout: Duration,
    },
}

/// Run a subprocess command with a timeout.
///
/// Wraps `Command::output()` with `tokio::time::timeout`, converting
/// timeout expiration into [`SubprocessError::Timeout`]. The child process
/// is killed automatically if the timeout elapses (via the tokio `Child`
/// drop implementation).
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, SubprocessError> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(SubprocessError::Io {
            description: description.to_string(),
            source: io_err,
        }),
        Err(_elapsed) => Err(SubprocessError::Timeout {
            description: description.to_string(),
            timeout,
        }),
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
