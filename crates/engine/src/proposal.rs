// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Proposal pipeline: feed each completed topic through the transformation
//! workflow and persist the concatenation.
//!
//! All or nothing. A failure on any topic leaves no proposal behind, only a
//! `failed` progress record; the next attempt starts again from the first
//! topic.

use rd_adapters::{collect_with_retry, RetryPolicy, WorkflowClient, WorkflowError, WorkflowRequest};
use rd_core::{Company, ProposalProgress, TopicIndex};
use rd_storage::{ArtifactStore, StoreError};
use thiserror::Error;
use tracing::{info, warn};

use crate::sanitize::strip_urls;

#[derive(Debug, Error)]
pub enum ProposalError {
    #[error("no results for company '{0}'")]
    NotFound(Company),

    #[error("company '{0}' has no research data to build a proposal from")]
    NoResearchData(Company),

    /// The transformation workflow cannot be used at all
    #[error("proposal workflow unavailable: {0}")]
    Unavailable(#[source] WorkflowError),

    #[error("proposal failed at topic {index}: {source}")]
    Topic {
        index: TopicIndex,
        #[source]
        source: WorkflowError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("proposal task failed: {0}")]
    Task(String),
}

#[derive(Clone)]
pub struct ProposalPipeline<W: WorkflowClient> {
    store: ArtifactStore,
    client: W,
    retry: RetryPolicy,
}

impl<W: WorkflowClient> ProposalPipeline<W> {
    pub fn new(store: ArtifactStore, client: W, retry: RetryPolicy) -> Self {
        Self { store, client, retry }
    }

    /// Transform `inputs` in order and persist the joined result.
    ///
    /// Progress is written before the first call and after every topic.
    pub async fn run(
        &self,
        company: &Company,
        inputs: &[(TopicIndex, String)],
    ) -> Result<String, ProposalError> {
        let total = inputs.len() as u32;
        self.store.write_proposal_progress(company, &ProposalProgress::running(0, total))?;
        info!(%company, topics = total, "proposal started");

        let mut parts = Vec::with_capacity(inputs.len());
        for (index, text) in inputs {
            let request = WorkflowRequest::Transform { research_out: strip_urls(text) };
            match collect_with_retry(&self.client, &request, self.retry).await {
                Ok(collected) => parts.push(collected.text.trim().to_string()),
                Err(source) => {
                    let err = ProposalError::Topic { index: *index, source };
                    let failed = ProposalProgress::failed(parts.len() as u32, total, err.to_string());
                    if let Err(e) = self.store.write_proposal_progress(company, &failed) {
                        warn!(%company, error = %e, "failed to record proposal failure");
                    }
                    warn!(%company, topic = %index, error = %err, "proposal failed");
                    return Err(err);
                }
            }
            let progress = ProposalProgress::running(parts.len() as u32, total);
            self.store.write_proposal_progress(company, &progress)?;
            info!(%company, topic = %index, current = progress.current, total, "proposal topic done");
        }

        let proposal = parts.join("\n\n");
        self.store.write_proposal(company, &proposal)?;
        self.store.clear_proposal_progress(company)?;
        info!(%company, chars = proposal.chars().count(), "proposal saved");
        Ok(proposal)
    }
}

#[cfg(test)]
#[path = "proposal_tests.rs"]
mod tests;
