// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rd-adapters: Boundaries to the operating system and the external workflow API

pub mod process;
pub mod workflow;

pub use process::{
    ExitResult, LocalProcessAdapter, ProcessAdapter, ProcessError, ProcessHandle, SpawnSpec,
};
pub use workflow::{
    collect_with_retry, Chunk, ChunkStream, Collected, DifyClient, DifyConfig, RetryPolicy,
    WorkflowClient, WorkflowError, WorkflowMode, WorkflowRequest,
};

#[cfg(any(test, feature = "test-support"))]
pub use process::{FakeProcessAdapter, SpawnCall};
#[cfg(any(test, feature = "test-support"))]
pub use workflow::{FakeReply, FakeWorkflowClient};
