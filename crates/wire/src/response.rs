// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use rd_core::{CompanyResults, JobId, JobKind, ProposalProgress, RunStatus, TopicArtifact};
use serde::{Deserialize, Serialize};

/// Job currently occupying the execution slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotHolder {
    pub company: String,
    pub kind: JobKind,
    pub job_id: JobId,
    pub started_at_ms: u64,
}

/// One prior version of an edited topic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    /// RFC 3339 timestamp of the edit that replaced this content
    pub edited_at: String,
    pub text: String,
    pub markdown: String,
}

/// Response from daemon to CLI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Response {
    /// Generic success
    Ok,

    /// Health check response
    Pong,

    /// Version handshake response
    Hello { version: String },

    /// Daemon is shutting down
    ShuttingDown,

    /// Daemon status
    Status {
        uptime_secs: u64,
        pid: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        holder: Option<SlotHolder>,
    },

    /// Error response
    Error { message: String },

    /// Another job holds the execution slot
    Busy { held_by: String, kind: JobKind },

    /// Research runner spawned
    Started { job_id: JobId, topics: Vec<u32> },

    /// Every topic already had content; nothing was started
    AlreadyComplete { company: String },

    /// Reconciled research status
    RunStatus { status: RunStatus },

    Results { results: CompanyResults },

    Companies { companies: Vec<String> },

    Deleted { existed: bool },

    TopicEdited { topic: TopicArtifact },

    History { entries: Vec<HistoryEntry> },

    Proposal { text: String, cached: bool },

    ProposalProgress { progress: ProposalProgress },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
