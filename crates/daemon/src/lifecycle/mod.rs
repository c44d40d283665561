// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown, recovery.

mod reconcile;
mod startup;
pub use reconcile::{reconcile_markers, ReconcileSummary};
pub use startup::startup;

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use rd_adapters::{DifyClient, LocalProcessAdapter, WorkflowError};
use rd_core::SystemClock;
use rd_engine::{EngineConfig, Orchestrator, RunnerCommand};
use rd_storage::ArtifactStore;
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

use crate::env;

/// Orchestrator with the production adapters
pub type DaemonEngine = Orchestrator<LocalProcessAdapter, DifyClient, SystemClock>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/rd)
    pub state_dir: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to version file
    pub version_path: PathBuf,
    /// Daemon and runner log files
    pub logs_path: PathBuf,
    /// Artifact store root
    pub outputs_root: PathBuf,
}

impl Config {
    /// Load configuration for the user-level daemon.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = env::state_dir()?;
        let outputs_root = env::outputs_root(&state_dir);
        Ok(Self::at(state_dir, outputs_root))
    }

    /// Fixed layout under `state_dir`
    pub fn at(state_dir: impl Into<PathBuf>, outputs_root: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            logs_path: state_dir.join("logs"),
            outputs_root: outputs_root.into(),
            state_dir,
        }
    }

    /// Build the production orchestrator from environment settings
    pub fn engine(&self) -> Result<DaemonEngine, LifecycleError> {
        let runner = RunnerCommand::new(env::runner_binary()).log_dir(&self.logs_path);
        let engine_config = EngineConfig {
            limits: env::limits(),
            runner,
            proposal_retry: env::retry_policy(),
        };
        let client = DifyClient::new(env::dify_config())?;
        Ok(Orchestrator::new(
            ArtifactStore::new(&self.outputs_root),
            LocalProcessAdapter::new(),
            client,
            SystemClock,
            engine_config,
        ))
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// When daemon started
    pub start_time: Instant,
}

/// Result of daemon startup: the daemon state plus the bound socket.
pub struct StartupResult {
    pub daemon: DaemonState,
    /// The Unix socket listener to spawn as a task
    pub listener: UnixListener,
}

impl DaemonState {
    /// Remove the socket, pid and version files.
    ///
    /// Runners are left alone; the next daemon adopts them from their markers.
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("shutting down daemon");

        for path in [&self.config.socket_path, &self.config.lock_path, &self.config.version_path] {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!(path = %path.display(), error = %e, "failed to remove daemon file");
                }
            }
        }

        // Lock file is released when self.lock_file is dropped
        info!("daemon shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("Workflow client error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
