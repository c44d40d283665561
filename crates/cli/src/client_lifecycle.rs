// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Starting and stopping the background daemon.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use rd_daemon::Config;
use rd_wire::ProtocolError;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::client::{ClientError, DaemonClient};

/// How long a fresh daemon gets to print READY
const START_TIMEOUT: Duration = Duration::from_secs(10);
/// How long `stop` waits for the socket to disappear
const STOP_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Locate `rdd`: RD_DAEMON_BINARY > sibling of this executable > PATH
pub fn find_rdd_binary() -> PathBuf {
    if let Some(path) = std::env::var_os("RD_DAEMON_BINARY").filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    let sibling =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(|dir| dir.join("rdd")));
    match sibling {
        Some(path) if path.exists() => path,
        _ => PathBuf::from("rdd"),
    }
}

/// Connect to a running daemon, starting one in the background if needed
pub async fn connect_or_start() -> Result<DaemonClient, ClientError> {
    match DaemonClient::connect() {
        Ok(client) => match client.ping().await {
            Ok(()) => return Ok(client),
            Err(e) if !e.is_not_running() => return Err(e),
            Err(_) => {}
        },
        Err(e) if !e.is_not_running() => return Err(e),
        Err(_) => {}
    }
    start_daemon().await
}

/// Spawn `rdd` detached and wait for it to report READY
pub async fn start_daemon() -> Result<DaemonClient, ClientError> {
    let config = Config::load()?;
    let binary = find_rdd_binary();
    let mut child = Command::new(&binary)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()
        .map_err(|e| ClientError::StartFailed(format!("{}: {}", binary.display(), e)))?;

    let Some(stdout) = child.stdout.take() else {
        return Err(ClientError::StartFailed("daemon stdout unavailable".to_string()));
    };
    let mut lines = BufReader::new(stdout).lines();
    let ready = tokio::time::timeout(START_TIMEOUT, async {
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim() == "READY" {
                return true;
            }
        }
        false
    })
    .await;

    match ready {
        Ok(true) => Ok(DaemonClient::new(config.socket_path)),
        Ok(false) => Err(ClientError::StartFailed(format!(
            "daemon exited during startup, see logs in {}",
            config.logs_path.display()
        ))),
        Err(_) => Err(ClientError::StartFailed(format!(
            "daemon not ready after {}s",
            START_TIMEOUT.as_secs()
        ))),
    }
}

/// Ask the daemon to stop. Returns `false` if it was not running.
pub async fn daemon_stop() -> Result<bool, ClientError> {
    let client = match DaemonClient::connect() {
        Ok(client) => client,
        Err(e) if e.is_not_running() => return Ok(false),
        Err(e) => return Err(e),
    };

    match client.shutdown().await {
        Ok(()) => {}
        Err(ClientError::NotRunning) => return Ok(false),
        // The daemon may exit before the response is flushed
        Err(ClientError::Protocol(ProtocolError::ConnectionClosed)) => {}
        Err(e) => return Err(e),
    }

    wait_for_removal(client.socket_path(), STOP_TIMEOUT).await;
    Ok(true)
}

/// Poll until `path` is gone or `timeout` passes; returns whether it is gone
pub(crate) async fn wait_for_removal(path: &Path, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while path.exists() {
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    true
}
