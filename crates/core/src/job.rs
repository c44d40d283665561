// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identity and externally visible run status.

use serde::{Deserialize, Serialize};

use crate::company::Company;
use crate::topic::TOPIC_COUNT;

/// Unique identifier for one supervised job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Generate a new random job id
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `n` characters, for compact display
    pub fn short(&self, n: usize) -> &str {
        let end = self.0.char_indices().nth(n).map(|(i, _)| i).unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What occupies the single execution slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Out-of-process research runner
    Research,
    /// In-daemon proposal transformation
    Proposal,
}

crate::simple_display! {
    JobKind {
        Research => "research",
        Proposal => "proposal",
    }
}

/// Externally visible research job state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    NotFound,
    Running,
    Completed,
}

crate::simple_display! {
    JobState {
        NotFound => "not_found",
        Running => "running",
        Completed => "completed",
    }
}

/// Terminal marker left on disk by the last finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalMarker {
    Done,
    Aborted,
}

crate::simple_display! {
    TerminalMarker {
        Done => "done",
        Aborted => "aborted",
    }
}

/// Topic completion counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: u32,
    pub total: u32,
}

impl Progress {
    /// Progress against the full topic catalog
    pub fn of_catalog(completed: usize) -> Self {
        Self { completed: completed as u32, total: TOPIC_COUNT as u32 }
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

/// Reconciled status of a company's research job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    pub company: Company,
    pub state: JobState,
    pub progress: Progress,
    /// Set when this daemon owns the running job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_outcome: Option<TerminalMarker>,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
