// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Facade over planning, supervision, reconciliation and proposals.
//!
//! One instance is shared by every connection the daemon serves. Status and
//! result reads never wait on the execution slot.

use rd_adapters::{ProcessAdapter, WorkflowClient, WorkflowMode};
use rd_core::{
    Clock, Company, CompanyResults, JobId, JobKind, ProposalProgress, ProposalStatus, RunStatus,
    TopicArtifact, TopicIndex,
};
use rd_storage::{ArtifactStore, EditRecord};
use tracing::{debug, info};

use crate::config::{EngineConfig, Limits};
use crate::error::EngineError;
use crate::planner::{plan_run, PlanError, RunPlan, TopicSelection};
use crate::proposal::{ProposalError, ProposalPipeline};
use crate::reconcile::{disk_live, job_status};
use crate::supervisor::{Acquire, SlotGuard, Supervisor};

/// Result of a run request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started { job_id: JobId, topics: Vec<TopicIndex> },
    /// Another job holds the slot
    Busy { held_by: Company, kind: JobKind },
    /// Every topic already has content; nothing was spawned
    AlreadyComplete,
}

/// Result of a proposal request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalOutcome {
    Cached(String),
    Created(String),
    Busy { held_by: Company, kind: JobKind },
}

#[derive(Clone)]
pub struct Orchestrator<P: ProcessAdapter, W: WorkflowClient, C: Clock> {
    store: ArtifactStore,
    supervisor: Supervisor<P, C>,
    proposals: ProposalPipeline<W>,
    client: W,
    clock: C,
    limits: Limits,
}

impl<P: ProcessAdapter, W: WorkflowClient, C: Clock> Orchestrator<P, W, C> {
    pub fn new(store: ArtifactStore, process: P, client: W, clock: C, config: EngineConfig) -> Self {
        let supervisor =
            Supervisor::new(process, clock.clone(), store.clone(), config.runner, config.limits);
        let proposals = ProposalPipeline::new(store.clone(), client.clone(), config.proposal_retry);
        Self { store, supervisor, proposals, client, clock, limits: config.limits }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn supervisor(&self) -> &Supervisor<P, C> {
        &self.supervisor
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    /// A research run for `company` is live in memory or on disk
    fn research_live(&self, company: &Company) -> bool {
        self.supervisor.is_running_for(company, JobKind::Research)
            || disk_live(&self.store.read_markers(company), self.now_ms(), &self.limits)
    }

    /// Plan and, if anything is left to do, start a research run
    pub async fn start_run(
        &self,
        company: &Company,
        topics: Option<&[u32]>,
    ) -> Result<StartOutcome, EngineError> {
        let selection = TopicSelection::from_request(topics)?;
        self.start(company, &selection).await
    }

    /// Rerun one topic, overwriting its content
    pub async fn rerun_topic(
        &self,
        company: &Company,
        index: u32,
    ) -> Result<StartOutcome, EngineError> {
        let index = TopicIndex::new(index).map_err(PlanError::from)?;
        self.start(company, &TopicSelection::single(index)).await
    }

    async fn start(
        &self,
        company: &Company,
        selection: &TopicSelection,
    ) -> Result<StartOutcome, EngineError> {
        let completed = self.store.completed_topics(company)?;
        let topics = match plan_run(&completed, selection) {
            RunPlan::Skip => {
                info!(%company, "all topics complete, nothing to run");
                return Ok(StartOutcome::AlreadyComplete);
            }
            RunPlan::Run(topics) => topics,
        };
        match self.supervisor.try_start_research(company, &topics).await? {
            Acquire::Acquired(job_id) => Ok(StartOutcome::Started { job_id, topics }),
            Acquire::Busy(holder) => {
                info!(%company, held_by = %holder.company, kind = %holder.kind, "run rejected, slot busy");
                Ok(StartOutcome::Busy { held_by: holder.company, kind: holder.kind })
            }
        }
    }

    pub fn status(&self, company: &Company) -> Result<RunStatus, EngineError> {
        let owned = self.supervisor.owned_run(company);
        Ok(job_status(&self.store, company, owned, self.now_ms(), &self.limits)?)
    }

    pub fn results(&self, company: &Company) -> Result<CompanyResults, EngineError> {
        let status = self.status(company)?;
        Ok(CompanyResults {
            company: company.clone(),
            state: status.state,
            progress: status.progress,
            items: self.store.read_topics(company)?,
            has_proposal: self.store.has_proposal(company)?,
        })
    }

    pub fn companies(&self) -> Result<Vec<Company>, EngineError> {
        Ok(self.store.list_companies()?)
    }

    /// Remove every artifact of `company`.
    ///
    /// Refused while any job for the company is live. Returns whether a
    /// directory existed.
    pub fn delete_results(&self, company: &Company) -> Result<bool, EngineError> {
        let now_ms = self.now_ms();
        let deleted = self.supervisor.exclusive(company, || {
            if disk_live(&self.store.read_markers(company), now_ms, &self.limits) {
                return Err(EngineError::Busy { held_by: company.clone(), kind: JobKind::Research });
            }
            Ok(self.store.delete(company)?)
        });
        let existed = match deleted {
            Ok(result) => result?,
            Err(holder) => {
                return Err(EngineError::Busy { held_by: holder.company, kind: holder.kind })
            }
        };
        info!(%company, existed, "results deleted");
        Ok(existed)
    }

    /// Replace a topic's content with user text, keeping the previous
    /// content in its history
    pub fn edit_topic(
        &self,
        company: &Company,
        index: u32,
        text: &str,
        markdown: Option<&str>,
    ) -> Result<TopicArtifact, EngineError> {
        let index = TopicIndex::new(index).map_err(PlanError::from)?;
        if self.research_live(company) {
            return Err(EngineError::Busy { held_by: company.clone(), kind: JobKind::Research });
        }
        let artifact = self.store.edit_topic(company, index, text, markdown, self.now_ms())?;
        info!(%company, topic = %index, history = artifact.history_count, "topic edited");
        Ok(artifact)
    }

    pub fn topic_history(
        &self,
        company: &Company,
        index: u32,
    ) -> Result<Vec<EditRecord>, EngineError> {
        let index = TopicIndex::new(index).map_err(PlanError::from)?;
        Ok(self.store.topic_history(company, index)?)
    }

    /// Return the cached proposal or build one.
    ///
    /// Building runs on its own task so it completes even if the caller goes
    /// away; the caller waits for it.
    pub async fn create_proposal(&self, company: &Company) -> Result<ProposalOutcome, EngineError> {
        if !self.store.exists(company) {
            return Err(ProposalError::NotFound(company.clone()).into());
        }
        if let Some(proposal) = self.store.read_proposal(company)? {
            debug!(%company, "proposal cache hit");
            return Ok(ProposalOutcome::Cached(proposal));
        }
        self.client.check_ready(WorkflowMode::Transform).map_err(ProposalError::Unavailable)?;
        let inputs = self.store.proposal_inputs(company)?;
        if inputs.is_empty() {
            return Err(ProposalError::NoResearchData(company.clone()).into());
        }

        let guard = match self.supervisor.reserve_proposal(company) {
            Ok(guard) => guard,
            Err(holder) => {
                info!(%company, held_by = %holder.company, "proposal rejected, slot busy");
                return Ok(ProposalOutcome::Busy { held_by: holder.company, kind: holder.kind });
            }
        };
        self.build_proposal(guard, company, inputs).await
    }

    /// Build a proposal while holding the slot.
    ///
    /// Another proposal job may have finished between the cache check and
    /// the reservation, so the cache is read again first.
    async fn build_proposal(
        &self,
        guard: SlotGuard,
        company: &Company,
        inputs: Vec<(TopicIndex, String)>,
    ) -> Result<ProposalOutcome, EngineError> {
        if let Some(proposal) = self.store.read_proposal(company)? {
            debug!(%company, "proposal cached while waiting for the slot");
            return Ok(ProposalOutcome::Cached(proposal));
        }
        let pipeline = self.proposals.clone();
        let owned = company.clone();
        let task = tokio::spawn(async move {
            let _guard = guard;
            pipeline.run(&owned, &inputs).await
        });
        match task.await {
            Ok(result) => Ok(ProposalOutcome::Created(result?)),
            Err(e) => Err(ProposalError::Task(e.to_string()).into()),
        }
    }

    /// Non-blocking proposal progress.
    ///
    /// A `running` record with no proposal job in this daemon was interrupted
    /// and reads as failed.
    pub fn proposal_progress(&self, company: &Company) -> Result<ProposalProgress, EngineError> {
        if self.store.has_proposal(company)? {
            let total = self.store.proposal_inputs(company)?.len() as u32;
            return Ok(ProposalProgress::completed(total));
        }
        let progress = match self.store.read_proposal_progress(company)? {
            None => ProposalProgress::idle(),
            Some(p)
                if p.status == ProposalStatus::Running
                    && !self.supervisor.is_running_for(company, JobKind::Proposal) =>
            {
                ProposalProgress::failed(p.current, p.total, "interrupted before completion")
            }
            Some(p) => p,
        };
        Ok(progress)
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
