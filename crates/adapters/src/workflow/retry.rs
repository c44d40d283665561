// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry policy around a full workflow invocation.

use std::time::Duration;

use futures::StreamExt;
use tracing::{info, warn};

use super::{WorkflowClient, WorkflowError, WorkflowRequest};

/// Fixed-backoff retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Pause between attempts
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), backoff }
    }

    /// Single attempt, no pause
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(10))
    }
}

/// Fully collected answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
    pub text: String,
    pub conversation_id: Option<String>,
    /// Attempts it took, starting at 1
    pub attempts: u32,
}

async fn collect_once<W: WorkflowClient>(
    client: &W,
    request: &WorkflowRequest,
) -> Result<(String, Option<String>), WorkflowError> {
    let mut stream = client.open(request).await?;
    let mut text = String::new();
    let mut conversation_id = None;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        text.push_str(&chunk.text);
        if chunk.conversation_id.is_some() {
            conversation_id = chunk.conversation_id;
        }
    }
    if text.trim().is_empty() {
        return Err(WorkflowError::EmptyAnswer);
    }
    Ok((text, conversation_id))
}

/// Invoke the workflow and concatenate its stream, retrying the whole call
/// on failure. A partially streamed answer is discarded before the next
/// attempt.
pub async fn collect_with_retry<W: WorkflowClient>(
    client: &W,
    request: &WorkflowRequest,
    policy: RetryPolicy,
) -> Result<Collected, WorkflowError> {
    let mode = request.mode();
    let mut attempt = 0;
    loop {
        attempt += 1;
        match collect_once(client, request).await {
            Ok((text, conversation_id)) => {
                if attempt > 1 {
                    info!(%mode, attempt, "workflow succeeded after retry");
                }
                return Ok(Collected { text, conversation_id, attempts: attempt });
            }
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) if attempt >= policy.max_attempts => {
                warn!(%mode, attempts = attempt, error = %e, "workflow retries exhausted");
                return Err(WorkflowError::RetriesExhausted { attempts: attempt, last: Box::new(e) });
            }
            Err(e) => {
                warn!(
                    %mode,
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "workflow attempt failed, retrying"
                );
                tokio::time::sleep(policy.backoff).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
