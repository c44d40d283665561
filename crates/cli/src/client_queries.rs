// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed request methods for DaemonClient.

use std::time::Duration;

use rd_core::{CompanyResults, JobId, ProposalProgress, RunStatus, TopicArtifact};
use rd_wire::{HistoryEntry, Request, Response, SlotHolder, PROTOCOL_VERSION};
use serde::Serialize;

use crate::client::{ClientError, DaemonClient};

/// Proposal creation waits on up to five workflow calls with retries
const PROPOSAL_TIMEOUT: Duration = Duration::from_secs(4 * 60 * 60);

/// Outcome of a run or rerun request that was not refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StartReply {
    Started { job_id: JobId, topics: Vec<u32> },
    AlreadyComplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaemonStatus {
    pub uptime_secs: u64,
    pub pid: u32,
    pub holder: Option<SlotHolder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposalReply {
    pub text: String,
    pub cached: bool,
}

impl DaemonClient {
    /// Daemon version via Hello handshake
    pub async fn hello(&self) -> Result<String, ClientError> {
        let request = Request::Hello { version: PROTOCOL_VERSION.to_string() };
        match self.send(&request).await? {
            Response::Hello { version } => Ok(version),
            other => Self::reject(other),
        }
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send(&Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Self::reject(other),
        }
    }

    pub async fn status(&self) -> Result<DaemonStatus, ClientError> {
        match self.send(&Request::Status).await? {
            Response::Status { uptime_secs, pid, holder } => {
                Ok(DaemonStatus { uptime_secs, pid, holder })
            }
            other => Self::reject(other),
        }
    }

    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(&Request::Shutdown).await? {
            Response::Ok | Response::ShuttingDown => Ok(()),
            other => Self::reject(other),
        }
    }

    pub async fn start_run(
        &self,
        company: &str,
        topics: Option<Vec<u32>>,
    ) -> Result<StartReply, ClientError> {
        let request = Request::StartRun { company: company.to_string(), topics };
        Self::start_reply(self.send(&request).await?)
    }

    pub async fn rerun_topic(&self, company: &str, index: u32) -> Result<StartReply, ClientError> {
        let request = Request::RerunTopic { company: company.to_string(), index };
        Self::start_reply(self.send(&request).await?)
    }

    fn start_reply(response: Response) -> Result<StartReply, ClientError> {
        match response {
            Response::Started { job_id, topics } => Ok(StartReply::Started { job_id, topics }),
            Response::AlreadyComplete { .. } => Ok(StartReply::AlreadyComplete),
            other => Self::reject(other),
        }
    }

    pub async fn run_status(&self, company: &str) -> Result<RunStatus, ClientError> {
        match self.send(&Request::GetStatus { company: company.to_string() }).await? {
            Response::RunStatus { status } => Ok(status),
            other => Self::reject(other),
        }
    }

    pub async fn results(&self, company: &str) -> Result<CompanyResults, ClientError> {
        match self.send(&Request::GetResults { company: company.to_string() }).await? {
            Response::Results { results } => Ok(results),
            other => Self::reject(other),
        }
    }

    pub async fn companies(&self) -> Result<Vec<String>, ClientError> {
        match self.send(&Request::ListCompanies).await? {
            Response::Companies { companies } => Ok(companies),
            other => Self::reject(other),
        }
    }

    /// Returns whether anything was deleted
    pub async fn delete_results(&self, company: &str) -> Result<bool, ClientError> {
        match self.send(&Request::DeleteResults { company: company.to_string() }).await? {
            Response::Deleted { existed } => Ok(existed),
            other => Self::reject(other),
        }
    }

    pub async fn edit_topic(
        &self,
        company: &str,
        index: u32,
        text: String,
        markdown: Option<String>,
    ) -> Result<TopicArtifact, ClientError> {
        let request = Request::EditTopic { company: company.to_string(), index, text, markdown };
        match self.send(&request).await? {
            Response::TopicEdited { topic } => Ok(topic),
            other => Self::reject(other),
        }
    }

    pub async fn topic_history(
        &self,
        company: &str,
        index: u32,
    ) -> Result<Vec<HistoryEntry>, ClientError> {
        match self.send(&Request::TopicHistory { company: company.to_string(), index }).await? {
            Response::History { entries } => Ok(entries),
            other => Self::reject(other),
        }
    }

    /// Cached proposal, or a new one. Blocks until generation finishes.
    pub async fn create_proposal(&self, company: &str) -> Result<ProposalReply, ClientError> {
        let request = Request::CreateProposal { company: company.to_string() };
        match self.send_with_timeout(&request, PROPOSAL_TIMEOUT).await? {
            Response::Proposal { text, cached } => Ok(ProposalReply { text, cached }),
            other => Self::reject(other),
        }
    }

    pub async fn proposal_progress(&self, company: &str) -> Result<ProposalProgress, ClientError> {
        let request = Request::GetProposalProgress { company: company.to_string() };
        match self.send(&request).await? {
            Response::ProposalProgress { progress } => Ok(progress),
            other => Self::reject(other),
        }
    }
}
