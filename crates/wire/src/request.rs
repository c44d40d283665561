// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// Request from CLI to daemon.
///
/// Company names travel as plain strings and are validated by the daemon, so
/// a bad name comes back as an error response rather than a broken frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello { version: String },

    /// Daemon status
    Status,

    /// Request daemon shutdown
    Shutdown,

    /// Start (or resume) research for a company
    StartRun {
        company: String,
        /// Explicit topic subset; omitted means resume incomplete topics
        #[serde(default, skip_serializing_if = "Option::is_none")]
        topics: Option<Vec<u32>>,
    },

    /// Reconciled research status
    GetStatus { company: String },

    /// All topic artifacts for a company
    GetResults { company: String },

    /// Companies with stored results
    ListCompanies,

    /// Remove a company's results entirely
    DeleteResults { company: String },

    /// Replace one topic's content
    EditTopic {
        company: String,
        index: u32,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        markdown: Option<String>,
    },

    /// Rerun a single topic
    RerunTopic { company: String, index: u32 },

    /// Edit history of one topic
    TopicHistory { company: String, index: u32 },

    /// Return the cached proposal or build it (long-running)
    CreateProposal { company: String },

    /// Proposal progress, never blocks
    GetProposalProgress { company: String },
}

impl Request {
    /// Whether the request only reads state
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Request::Ping
                | Request::Hello { .. }
                | Request::Status
                | Request::GetStatus { .. }
                | Request::GetResults { .. }
                | Request::ListCompanies
                | Request::TopicHistory { .. }
                | Request::GetProposalProgress { .. }
        )
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
