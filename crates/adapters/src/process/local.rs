// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local subprocess backend on top of `tokio::process`.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::process::Child;
use tokio::sync::{oneshot, watch};

use super::{ExitResult, ProcessAdapter, ProcessError, ProcessHandle, SpawnSpec};

/// Spawns real child processes.
///
/// Each child gets a reaper task that waits on it (so it never lingers as a
/// zombie) and publishes the exit through the handle. Children are placed in
/// their own process group so a daemon restart does not take them down.
#[derive(Clone, Default)]
pub struct LocalProcessAdapter {
    kills: Arc<Mutex<HashMap<u64, oneshot::Sender<()>>>>,
    next_id: Arc<AtomicU64>,
}

impl LocalProcessAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

fn output_stdio(spec: &SpawnSpec) -> Result<(Stdio, Stdio), ProcessError> {
    let Some(path) = &spec.log_path else {
        return Ok((Stdio::null(), Stdio::null()));
    };
    let open = || -> std::io::Result<std::fs::File> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::OpenOptions::new().create(true).append(true).open(path)
    };
    let file = open().map_err(|e| ProcessError::LogFile { path: path.clone(), source: e })?;
    let err = file.try_clone().map_err(|e| ProcessError::LogFile { path: path.clone(), source: e })?;
    Ok((Stdio::from(file), Stdio::from(err)))
}

#[async_trait]
impl ProcessAdapter for LocalProcessAdapter {
    async fn spawn(&self, spec: SpawnSpec) -> Result<ProcessHandle, ProcessError> {
        let (stdout, stderr) = output_stdio(&spec)?;

        let mut cmd = tokio::process::Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .kill_on_drop(false);
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd
            .spawn()
            .map_err(|e| ProcessError::SpawnFailed { program: spec.program.clone(), source: e })?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let pid = child.id();
        let (exit_tx, exit_rx) = watch::channel(None);
        let (kill_tx, kill_rx) = oneshot::channel();
        self.kills.lock().insert(id, kill_tx);

        let kills = Arc::clone(&self.kills);
        tokio::spawn(async move {
            let result = reap(child, kill_rx).await;
            kills.lock().remove(&id);
            tracing::info!(process = id, ?pid, exit = %result, "child process exited");
            let _ = exit_tx.send(Some(result));
        });

        tracing::info!(
            process = id,
            ?pid,
            program = %spec.program.display(),
            args = ?spec.args,
            "child process spawned"
        );
        Ok(ProcessHandle::new(id, pid, exit_rx))
    }

    async fn kill(&self, handle: &ProcessHandle) -> Result<(), ProcessError> {
        // No sender means the reaper already observed the exit
        if let Some(tx) = self.kills.lock().remove(&handle.id()) {
            let _ = tx.send(());
        }
        Ok(())
    }
}

async fn reap(mut child: Child, mut kill_rx: oneshot::Receiver<()>) -> ExitResult {
    let status = tokio::select! {
        status = child.wait() => status,
        Ok(()) = &mut kill_rx => {
            if let Err(e) = child.start_kill() {
                tracing::warn!(error = %e, "failed to signal child process");
            }
            child.wait().await
        }
    };
    match status {
        Ok(status) => match status.code() {
            Some(code) => ExitResult::Exited(code),
            None => ExitResult::Signaled,
        },
        Err(e) => ExitResult::WaitFailed(e.to_string()),
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
