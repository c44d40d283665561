// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Externally visible job status.
//!
//! Memory first, then disk: a run owned by this daemon is answered from its
//! process handle; otherwise the marker files decide. That second tier is what
//! lets a restarted daemon keep reporting a runner that outlived it.

use rd_core::{Company, JobId, JobState, Progress, RunStatus};
use rd_storage::{ArtifactStore, MarkerSnapshot, StoreError};

use crate::config::Limits;

/// The supervisor's view of a research run it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedRun {
    pub job_id: JobId,
    pub started_at_ms: u64,
    pub alive: bool,
}

/// Whether the markers alone prove a live runner: a run started, has not
/// finished, its heartbeat is fresh and it is still inside the run ceiling.
pub fn disk_live(markers: &MarkerSnapshot, now_ms: u64, limits: &Limits) -> bool {
    let (Some(running_ms), Some(heartbeat_ms)) = (markers.running_ms, markers.heartbeat_ms) else {
        return false;
    };
    markers.terminal().is_none()
        && now_ms.saturating_sub(heartbeat_ms) <= limits.heartbeat_stale.as_millis() as u64
        && now_ms.saturating_sub(running_ms) <= limits.max_run.as_millis() as u64
}

pub fn job_state(
    memory_alive: bool,
    markers: &MarkerSnapshot,
    any_content: bool,
    now_ms: u64,
    limits: &Limits,
) -> JobState {
    if memory_alive || disk_live(markers, now_ms, limits) {
        JobState::Running
    } else if markers.done && markers.running_ms.is_none() {
        JobState::Completed
    } else if any_content {
        JobState::Completed
    } else {
        JobState::NotFound
    }
}

/// Reconcile a company's status from the supervisor's record and the store
pub fn job_status(
    store: &ArtifactStore,
    company: &Company,
    owned: Option<OwnedRun>,
    now_ms: u64,
    limits: &Limits,
) -> Result<RunStatus, StoreError> {
    let markers = store.read_markers(company);
    let completed = store.completed_topics(company)?;
    let memory_alive = owned.as_ref().is_some_and(|run| run.alive);
    let state = job_state(memory_alive, &markers, !completed.is_empty(), now_ms, limits);

    let (job_id, started_at_ms) = match owned.filter(|run| run.alive) {
        Some(run) => (Some(run.job_id), Some(run.started_at_ms)),
        None => (None, None),
    };
    Ok(RunStatus {
        company: company.clone(),
        state,
        progress: Progress::of_catalog(completed.len()),
        job_id,
        started_at_ms,
        last_outcome: markers.terminal(),
    })
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
