// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Proposal generation progress.

use serde::{Deserialize, Serialize};

/// Lifecycle of a company's proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Never started, or no progress recorded
    Idle,
    Running,
    Completed,
    /// Terminal without a persisted proposal
    Failed,
}

crate::simple_display! {
    ProposalStatus {
        Idle => "idle",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

/// `{current, total, status}` counter persisted next to the proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalProgress {
    pub current: u32,
    pub total: u32,
    pub status: ProposalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProposalProgress {
    pub fn idle() -> Self {
        Self { current: 0, total: 0, status: ProposalStatus::Idle, message: None }
    }

    pub fn running(current: u32, total: u32) -> Self {
        Self { current, total, status: ProposalStatus::Running, message: None }
    }

    pub fn completed(total: u32) -> Self {
        Self { current: total, total, status: ProposalStatus::Completed, message: None }
    }

    pub fn failed(current: u32, total: u32, message: impl Into<String>) -> Self {
        Self { current, total, status: ProposalStatus::Failed, message: Some(message.into()) }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, ProposalStatus::Completed | ProposalStatus::Failed)
    }
}

#[cfg(test)]
#[path = "proposal_tests.rs"]
mod tests;
