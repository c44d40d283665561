// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type for orchestrator operations

use rd_core::{Company, JobKind};
use rd_storage::StoreError;
use thiserror::Error;

use crate::planner::PlanError;
use crate::proposal::ProposalError;
use crate::supervisor::SupervisorError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    #[error(transparent)]
    Proposal(#[from] ProposalError),

    /// The operation conflicts with a live job
    #[error("'{held_by}' is busy with a {kind} job")]
    Busy { held_by: Company, kind: JobKind },
}
