// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rd-engine: Research job orchestration.
//!
//! Decides what to run, gates execution through a single slot, supervises the
//! out-of-process runner and reconstructs job state from marker files.

mod config;
mod error;
mod orchestrator;
pub mod planner;
pub mod proposal;
pub mod reconcile;
pub mod runner;
pub mod sanitize;
pub mod supervisor;

pub use config::{EngineConfig, Limits, RunnerCommand, RunnerSettings};
pub use error::EngineError;
pub use orchestrator::{Orchestrator, ProposalOutcome, StartOutcome};
pub use planner::{plan_run, PlanError, RunPlan, TopicSelection};
pub use proposal::{ProposalError, ProposalPipeline};
pub use reconcile::{job_status, OwnedRun};
pub use runner::{run_topics, RunnerError};
pub use supervisor::{Acquire, Holder, SlotGuard, Supervisor, SupervisorError};
