// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine tunables, filled in from the environment by the binaries.

use std::path::PathBuf;
use std::time::Duration;

use rd_adapters::RetryPolicy;

/// Liveness thresholds shared by the reconciler and the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// A heartbeat older than this no longer proves the runner is alive
    pub heartbeat_stale: Duration,
    /// Ceiling on a single run's elapsed time
    pub max_run: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self { heartbeat_stale: Duration::from_secs(60), max_run: Duration::from_secs(10_800) }
    }
}

/// How the supervisor launches the runner binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerCommand {
    pub program: PathBuf,
    /// Directory for `runner-<company>.log`; output is discarded without one
    pub log_dir: Option<PathBuf>,
}

impl RunnerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), log_dir: None }
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}

/// Pacing of the runner's topic loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerSettings {
    pub retry: RetryPolicy,
    /// Pause between consecutive topics
    pub inter_delay: Duration,
    pub heartbeat_interval: Duration,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            inter_delay: Duration::from_secs(8),
            heartbeat_interval: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub limits: Limits,
    pub runner: RunnerCommand,
    /// Retry policy for each proposal transformation call
    pub proposal_retry: RetryPolicy,
}

impl EngineConfig {
    pub fn new(runner: RunnerCommand) -> Self {
        Self { limits: Limits::default(), runner, proposal_retry: RetryPolicy::default() }
    }
}
