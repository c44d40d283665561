// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process supervision capability: spawn a child, observe its exit, kill it.

mod local;

pub use local::LocalProcessAdapter;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

/// Errors from process operations
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {}: {source}", program.display())]
    SpawnFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    /// File receiving the child's stdout and stderr (appended)
    pub log_path: Option<PathBuf>,
}

impl SpawnSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), env: Vec::new(), log_path: None }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }
}

/// How a supervised process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitResult {
    Exited(i32),
    /// Terminated by a signal (including our own kill)
    Signaled,
    /// The exit could not be observed; the process is treated as gone
    WaitFailed(String),
}

impl ExitResult {
    pub fn success(&self) -> bool {
        matches!(self, ExitResult::Exited(0))
    }
}

impl std::fmt::Display for ExitResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitResult::Exited(code) => write!(f, "exit code {}", code),
            ExitResult::Signaled => f.write_str("killed by signal"),
            ExitResult::WaitFailed(e) => write!(f, "wait failed: {}", e),
        }
    }
}

/// Handle to a spawned process.
///
/// Cloneable; every clone observes the same exit notification.
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    id: u64,
    pid: Option<u32>,
    exit: watch::Receiver<Option<ExitResult>>,
}

impl ProcessHandle {
    pub(crate) fn new(id: u64, pid: Option<u32>, exit: watch::Receiver<Option<ExitResult>>) -> Self {
        Self { id, pid, exit }
    }

    /// Adapter-local handle id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// OS process id, when known
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn exit_result(&self) -> Option<ExitResult> {
        self.exit.borrow().clone()
    }

    pub fn is_alive(&self) -> bool {
        self.exit.borrow().is_none()
    }

    /// Resolve once the process has exited
    pub async fn wait(&self) -> ExitResult {
        let mut exit = self.exit.clone();
        loop {
            if let Some(result) = exit.borrow_and_update().clone() {
                return result;
            }
            if exit.changed().await.is_err() {
                return exit
                    .borrow()
                    .clone()
                    .unwrap_or_else(|| ExitResult::WaitFailed("exit channel closed".to_string()));
            }
        }
    }
}

/// Adapter for spawning and supervising child processes
#[async_trait]
pub trait ProcessAdapter: Clone + Send + Sync + 'static {
    /// Start a process. It keeps running independently of the caller.
    async fn spawn(&self, spec: SpawnSpec) -> Result<ProcessHandle, ProcessError>;

    /// Block until the process exits
    async fn wait(&self, handle: &ProcessHandle) -> ExitResult {
        handle.wait().await
    }

    /// Non-blocking liveness check
    fn is_alive(&self, handle: &ProcessHandle) -> bool {
        handle.is_alive()
    }

    /// Request termination. Exit is still observed through `wait`.
    async fn kill(&self, handle: &ProcessHandle) -> Result<(), ProcessError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ExitResult, ProcessAdapter, ProcessError, ProcessHandle, SpawnSpec};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::watch;

    /// Recorded spawn
    #[derive(Debug, Clone)]
    pub struct SpawnCall {
        pub id: u64,
        pub spec: SpawnSpec,
    }

    #[derive(Default)]
    struct FakeProcessState {
        spawns: Vec<SpawnCall>,
        kills: Vec<u64>,
        running: HashMap<u64, watch::Sender<Option<ExitResult>>>,
        fail_next: Option<String>,
        next_id: u64,
    }

    /// Fake process adapter: processes live until the test ends them
    #[derive(Clone, Default)]
    pub struct FakeProcessAdapter {
        inner: Arc<Mutex<FakeProcessState>>,
    }

    impl FakeProcessAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make the next spawn fail with the given message
        pub fn fail_next_spawn(&self, message: impl Into<String>) {
            self.inner.lock().fail_next = Some(message.into());
        }

        pub fn spawns(&self) -> Vec<SpawnCall> {
            self.inner.lock().spawns.clone()
        }

        pub fn kills(&self) -> Vec<u64> {
            self.inner.lock().kills.clone()
        }

        pub fn running_count(&self) -> usize {
            self.inner.lock().running.len()
        }

        /// End a process with the given result
        pub fn exit(&self, id: u64, result: ExitResult) {
            if let Some(tx) = self.inner.lock().running.remove(&id) {
                let _ = tx.send(Some(result));
            }
        }

        /// End the most recently spawned process
        pub fn exit_last(&self, result: ExitResult) {
            let last = self.inner.lock().spawns.last().map(|s| s.id);
            if let Some(id) = last {
                self.exit(id, result);
            }
        }
    }

    #[async_trait]
    impl ProcessAdapter for FakeProcessAdapter {
        async fn spawn(&self, spec: SpawnSpec) -> Result<ProcessHandle, ProcessError> {
            let mut inner = self.inner.lock();
            if let Some(message) = inner.fail_next.take() {
                return Err(ProcessError::SpawnFailed {
                    program: spec.program,
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, message),
                });
            }
            inner.next_id += 1;
            let id = inner.next_id;
            let (tx, rx) = watch::channel(None);
            inner.running.insert(id, tx);
            inner.spawns.push(SpawnCall { id, spec });
            Ok(ProcessHandle::new(id, Some(10_000 + id as u32), rx))
        }

        async fn kill(&self, handle: &ProcessHandle) -> Result<(), ProcessError> {
            self.inner.lock().kills.push(handle.id());
            self.exit(handle.id(), ExitResult::Signaled);
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcessAdapter, SpawnCall};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
