// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External AI workflow boundary.
//!
//! A request opens a finite stream of text chunks. Callers normally go through
//! [`collect_with_retry`], which concatenates the stream and owns the retry
//! policy so individual transient failures never reach the caller.

mod dify;
mod retry;
mod sse;

pub use dify::{DifyClient, DifyConfig};
pub use retry::{collect_with_retry, Collected, RetryPolicy};

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

/// Errors from the workflow client
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Missing API key or unusable client settings
    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("api error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The workflow emitted an error event mid-stream
    #[error("workflow error: {0}")]
    Stream(String),

    #[error("stream finished without any answer text")]
    EmptyAnswer,

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<WorkflowError> },
}

impl WorkflowError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, WorkflowError::Config(_) | WorkflowError::RetriesExhausted { .. })
    }
}

/// Which workflow endpoint a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowMode {
    /// Conversational research, one question per topic
    Research,
    /// One-shot transformation of research output into proposal text
    Transform,
}

rd_core::simple_display! {
    WorkflowMode {
        Research => "research",
        Transform => "transform",
    }
}

/// Input for one workflow invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowRequest {
    Research { company: String, query: String, conversation_id: Option<String> },
    Transform { research_out: String },
}

impl WorkflowRequest {
    pub fn mode(&self) -> WorkflowMode {
        match self {
            WorkflowRequest::Research { .. } => WorkflowMode::Research,
            WorkflowRequest::Transform { .. } => WorkflowMode::Transform,
        }
    }
}

/// Incremental piece of a streamed answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    /// Conversation the answer belongs to, when the workflow reports one
    pub conversation_id: Option<String>,
}

/// Lazy, finite stream of answer chunks
pub type ChunkStream = BoxStream<'static, Result<Chunk, WorkflowError>>;

/// Client for the external workflow service
#[async_trait]
pub trait WorkflowClient: Clone + Send + Sync + 'static {
    /// Fail fast when the client cannot serve `mode` at all
    fn check_ready(&self, _mode: WorkflowMode) -> Result<(), WorkflowError> {
        Ok(())
    }

    /// Open a streaming invocation
    async fn open(&self, request: &WorkflowRequest) -> Result<ChunkStream, WorkflowError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Chunk, ChunkStream, WorkflowClient, WorkflowError, WorkflowMode, WorkflowRequest};
    use async_trait::async_trait;
    use futures::StreamExt;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Scripted outcome for one `open` call
    #[derive(Debug, Clone)]
    pub enum FakeReply {
        /// Stream these chunks, then finish
        Answer { chunks: Vec<String>, conversation_id: Option<String> },
        /// Fail before any chunk (connection refused, 5xx, ...)
        OpenError(String),
        /// Stream some chunks, then fail
        BreakAfter { chunks: Vec<String>, error: String },
        /// Finish without any text
        Empty,
    }

    impl FakeReply {
        pub fn answer(text: impl Into<String>) -> Self {
            FakeReply::Answer { chunks: vec![text.into()], conversation_id: None }
        }
    }

    #[derive(Default)]
    struct FakeWorkflowState {
        calls: Vec<WorkflowRequest>,
        script: VecDeque<FakeReply>,
        unconfigured: Vec<WorkflowMode>,
    }

    /// Fake workflow client.
    ///
    /// Plays scripted replies in order; once the script runs out it answers
    /// every request with a deterministic echo of its input.
    #[derive(Clone, Default)]
    pub struct FakeWorkflowClient {
        inner: Arc<Mutex<FakeWorkflowState>>,
    }

    impl FakeWorkflowClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_reply(&self, reply: FakeReply) {
            self.inner.lock().script.push_back(reply);
        }

        /// Make `check_ready` fail for `mode`
        pub fn set_unconfigured(&self, mode: WorkflowMode) {
            self.inner.lock().unconfigured.push(mode);
        }

        pub fn calls(&self) -> Vec<WorkflowRequest> {
            self.inner.lock().calls.clone()
        }

        pub fn call_count(&self) -> usize {
            self.inner.lock().calls.len()
        }

        /// The deterministic reply used once the script is exhausted
        pub fn echo(request: &WorkflowRequest) -> String {
            match request {
                WorkflowRequest::Research { company, query, .. } => {
                    format!("{company}: {query}")
                }
                WorkflowRequest::Transform { research_out } => format!("proposal[{research_out}]"),
            }
        }
    }

    #[async_trait]
    impl WorkflowClient for FakeWorkflowClient {
        fn check_ready(&self, mode: WorkflowMode) -> Result<(), WorkflowError> {
            if self.inner.lock().unconfigured.contains(&mode) {
                return Err(WorkflowError::Config(format!("{mode} workflow is not configured")));
            }
            Ok(())
        }

        async fn open(&self, request: &WorkflowRequest) -> Result<ChunkStream, WorkflowError> {
            self.check_ready(request.mode())?;
            let reply = {
                let mut inner = self.inner.lock();
                inner.calls.push(request.clone());
                inner.script.pop_front()
            };
            let reply = reply.unwrap_or_else(|| FakeReply::answer(Self::echo(request)));

            let items: Vec<Result<Chunk, WorkflowError>> = match reply {
                FakeReply::Answer { chunks, conversation_id } => chunks
                    .into_iter()
                    .map(|text| Ok(Chunk { text, conversation_id: conversation_id.clone() }))
                    .collect(),
                FakeReply::OpenError(message) => return Err(WorkflowError::Network(message)),
                FakeReply::BreakAfter { chunks, error } => chunks
                    .into_iter()
                    .map(|text| Ok(Chunk { text, conversation_id: None }))
                    .chain(std::iter::once(Err(WorkflowError::Stream(error))))
                    .collect(),
                FakeReply::Empty => Vec::new(),
            };
            Ok(futures::stream::iter(items).boxed())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeReply, FakeWorkflowClient};
