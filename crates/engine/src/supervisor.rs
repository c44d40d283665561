// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight job supervisor.
//!
//! One slot, system-wide. Research runs hold it for the lifetime of their
//! runner process; proposal runs hold it through a [`SlotGuard`]; runs found
//! live on disk at startup are adopted into it until their heartbeat goes
//! stale. The exit monitor is the only path that releases a research slot.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rd_adapters::{ExitResult, ProcessAdapter, ProcessError, ProcessHandle, SpawnSpec};
use rd_core::{Clock, Company, JobId, JobKind, TopicIndex};
use rd_storage::ArtifactStore;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{Limits, RunnerCommand};
use crate::reconcile::{disk_live, OwnedRun};

/// How often an adopted run's markers are re-checked
pub const ADOPT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("failed to start runner for '{company}': {source}")]
    Spawn {
        company: Company,
        #[source]
        source: ProcessError,
    },
}

/// Who currently holds the slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holder {
    pub company: Company,
    pub kind: JobKind,
    pub job_id: JobId,
    pub started_at_ms: u64,
}

/// Result of trying to take the slot for a research run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquire {
    Acquired(JobId),
    Busy(Holder),
}

#[derive(Debug, Clone)]
enum Liveness {
    /// Reserved, runner not spawned yet
    Pending,
    Process(ProcessHandle),
    /// Found live on disk at startup; no handle
    Adopted,
    /// In-daemon task holding a [`SlotGuard`]
    Task,
}

#[derive(Debug, Clone)]
struct JobRecord {
    holder: Holder,
    liveness: Liveness,
}

type Slot = Arc<Mutex<Option<JobRecord>>>;

fn release(slot: &Slot, job_id: &JobId) -> bool {
    let mut slot = slot.lock();
    if slot.as_ref().is_some_and(|r| &r.holder.job_id == job_id) {
        *slot = None;
        true
    } else {
        false
    }
}

/// Releases a proposal slot on drop
#[derive(Debug)]
pub struct SlotGuard {
    slot: Slot,
    job_id: JobId,
}

impl SlotGuard {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        release(&self.slot, &self.job_id);
    }
}

#[derive(Clone)]
pub struct Supervisor<P: ProcessAdapter, C: Clock> {
    slot: Slot,
    process: P,
    clock: C,
    store: ArtifactStore,
    runner: RunnerCommand,
    limits: Limits,
}

impl<P: ProcessAdapter, C: Clock> Supervisor<P, C> {
    pub fn new(
        process: P,
        clock: C,
        store: ArtifactStore,
        runner: RunnerCommand,
        limits: Limits,
    ) -> Self {
        Self { slot: Arc::new(Mutex::new(None)), process, clock, store, runner, limits }
    }

    fn reserve(&self, company: &Company, kind: JobKind, liveness: Liveness) -> Result<JobId, Holder> {
        let mut slot = self.slot.lock();
        if let Some(record) = slot.as_ref() {
            return Err(record.holder.clone());
        }
        let job_id = JobId::new();
        *slot = Some(JobRecord {
            holder: Holder {
                company: company.clone(),
                kind,
                job_id: job_id.clone(),
                started_at_ms: self.clock.epoch_ms(),
            },
            liveness,
        });
        Ok(job_id)
    }

    /// Current slot holder, if any
    pub fn holder(&self) -> Option<Holder> {
        self.slot.lock().as_ref().map(|r| r.holder.clone())
    }

    /// Whether the slot is held by a job of `kind` for `company`
    pub fn is_running_for(&self, company: &Company, kind: JobKind) -> bool {
        self.slot
            .lock()
            .as_ref()
            .is_some_and(|r| &r.holder.company == company && r.holder.kind == kind)
    }

    /// The research run this daemon owns for `company`, if any.
    ///
    /// Adopted runs are not owned; their liveness comes from disk.
    pub fn owned_run(&self, company: &Company) -> Option<OwnedRun> {
        let slot = self.slot.lock();
        let record = slot.as_ref()?;
        if &record.holder.company != company || record.holder.kind != JobKind::Research {
            return None;
        }
        let alive = match &record.liveness {
            Liveness::Pending | Liveness::Task => true,
            Liveness::Process(handle) => self.process.is_alive(handle),
            Liveness::Adopted => return None,
        };
        Some(OwnedRun {
            job_id: record.holder.job_id.clone(),
            started_at_ms: record.holder.started_at_ms,
            alive,
        })
    }

    /// Take the slot and spawn a runner for `topics`.
    ///
    /// A failed spawn releases the slot before returning.
    pub async fn try_start_research(
        &self,
        company: &Company,
        topics: &[TopicIndex],
    ) -> Result<Acquire, SupervisorError> {
        let job_id = match self.reserve(company, JobKind::Research, Liveness::Pending) {
            Ok(job_id) => job_id,
            Err(holder) => return Ok(Acquire::Busy(holder)),
        };

        let handle = match self.process.spawn(self.runner_spec(company, topics)).await {
            Ok(handle) => handle,
            Err(source) => {
                release(&self.slot, &job_id);
                error!(%company, job_id = %job_id, error = %source, "runner spawn failed");
                return Err(SupervisorError::Spawn { company: company.clone(), source });
            }
        };

        if let Some(record) = self.slot.lock().as_mut() {
            if record.holder.job_id == job_id {
                record.liveness = Liveness::Process(handle.clone());
            }
        }
        info!(
            %company,
            job_id = %job_id,
            pid = ?handle.pid(),
            topics = %join_topics(topics),
            "runner spawned"
        );

        let this = self.clone();
        let monitor_job = job_id.clone();
        let monitor_company = company.clone();
        tokio::spawn(async move { this.monitor(monitor_job, monitor_company, handle).await });

        Ok(Acquire::Acquired(job_id))
    }

    fn runner_spec(&self, company: &Company, topics: &[TopicIndex]) -> SpawnSpec {
        let mut spec = SpawnSpec::new(&self.runner.program)
            .arg("--company")
            .arg(company.as_str())
            .arg("--topics")
            .arg(join_topics(topics))
            .env("OUTPUTS_ROOT", self.store.root().display().to_string());
        if let Some(dir) = &self.runner.log_dir {
            spec = spec.log_path(dir.join(format!("runner-{}.log", company)));
        }
        spec
    }

    async fn monitor(self, job_id: JobId, company: Company, handle: ProcessHandle) {
        let exit = tokio::select! {
            exit = self.process.wait(&handle) => exit,
            _ = tokio::time::sleep(self.limits.max_run) => {
                warn!(%company, job_id = %job_id, "runner exceeded max run time, killing");
                match self.process.kill(&handle).await {
                    Ok(()) => self.process.wait(&handle).await,
                    Err(e) => ExitResult::WaitFailed(e.to_string()),
                }
            }
        };

        match self.store.abort_unfinished(&company) {
            Ok(true) => warn!(%company, job_id = %job_id, %exit, "runner exited without a terminal marker"),
            Ok(false) => {}
            Err(e) => warn!(%company, job_id = %job_id, error = %e, "failed to repair markers"),
        }
        release(&self.slot, &job_id);
        info!(%company, job_id = %job_id, %exit, "runner finished, slot released");
    }

    /// Run `f` with the slot locked so no job can start meanwhile.
    ///
    /// Fails with the holder if the slot belongs to `company`. `f` must not
    /// call back into the supervisor.
    pub fn exclusive<T>(&self, company: &Company, f: impl FnOnce() -> T) -> Result<T, Holder> {
        let slot = self.slot.lock();
        if let Some(record) = slot.as_ref().filter(|r| &r.holder.company == company) {
            return Err(record.holder.clone());
        }
        Ok(f())
    }

    /// Take the slot for an in-daemon proposal job
    pub fn reserve_proposal(&self, company: &Company) -> Result<SlotGuard, Holder> {
        let job_id = self.reserve(company, JobKind::Proposal, Liveness::Task)?;
        info!(%company, job_id = %job_id, "proposal slot reserved");
        Ok(SlotGuard { slot: Arc::clone(&self.slot), job_id })
    }

    /// Hold the slot for a runner left behind by a previous daemon.
    ///
    /// The slot is released once the markers stop proving the run is live;
    /// a run that went stale without finishing is closed as aborted.
    /// Returns `false` if the slot is already taken.
    pub fn adopt(&self, company: &Company, started_at_ms: u64) -> bool {
        let job_id = {
            let mut slot = self.slot.lock();
            if slot.is_some() {
                return false;
            }
            let job_id = JobId::new();
            *slot = Some(JobRecord {
                holder: Holder {
                    company: company.clone(),
                    kind: JobKind::Research,
                    job_id: job_id.clone(),
                    started_at_ms,
                },
                liveness: Liveness::Adopted,
            });
            job_id
        };
        info!(%company, job_id = %job_id, "adopted live runner from disk");

        let this = self.clone();
        let company = company.clone();
        tokio::spawn(async move { this.watch_adopted(job_id, company).await });
        true
    }

    async fn watch_adopted(self, job_id: JobId, company: Company) {
        loop {
            tokio::time::sleep(ADOPT_POLL_INTERVAL).await;
            let markers = self.store.read_markers(&company);
            if disk_live(&markers, self.clock.epoch_ms(), &self.limits) {
                continue;
            }
            if let Err(e) = self.store.abort_unfinished(&company) {
                warn!(%company, error = %e, "failed to close stale adopted run");
            }
            release(&self.slot, &job_id);
            info!(%company, job_id = %job_id, outcome = ?markers.terminal(), "adopted run ended");
            return;
        }
    }
}

fn join_topics(topics: &[TopicIndex]) -> String {
    topics.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
