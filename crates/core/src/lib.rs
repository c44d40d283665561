// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rd-core: Domain types shared by the research desk daemon, runner and CLI

pub mod macros;

pub mod artifact;
pub mod clock;
pub mod company;
pub mod job;
pub mod proposal;
pub mod topic;

pub use artifact::{CompanyResults, TopicArtifact};
pub use clock::{Clock, FakeClock, SystemClock};
pub use company::{Company, CompanyError};
pub use job::{JobId, JobKind, JobState, Progress, RunStatus, TerminalMarker};
pub use proposal::{ProposalProgress, ProposalStatus};
pub use topic::{TopicError, TopicIndex, TOPICS, TOPIC_COUNT};
