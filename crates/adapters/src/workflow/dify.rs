// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dify HTTP client.
//!
//! Research questions go to the chat endpoint (one conversation per run);
//! proposal transformation goes to the workflow endpoint. Both are consumed
//! as server-sent events.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::{header, Client};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::sse::DifyEventStream;
use super::{ChunkStream, WorkflowClient, WorkflowError, WorkflowMode, WorkflowRequest};

/// Connection settings for the Dify API
#[derive(Debug, Clone)]
pub struct DifyConfig {
    pub base_url: String,
    /// Key for the research chat app
    pub chat_api_key: Option<String>,
    /// Key for the proposal workflow app
    pub workflow_api_key: Option<String>,
    /// Value sent as the `user` field
    pub user: String,
    /// Whole-request timeout, including the streamed body
    pub timeout: Duration,
}

impl Default for DifyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.dify.ai/v1".to_string(),
            chat_api_key: None,
            workflow_api_key: None,
            user: "REACHA_agent".to_string(),
            timeout: Duration::from_secs(10_800),
        }
    }
}

#[derive(Clone)]
pub struct DifyClient {
    http: Client,
    config: Arc<DifyConfig>,
}

impl DifyClient {
    pub fn new(config: DifyConfig) -> Result<Self, WorkflowError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| WorkflowError::Config(format!("failed to build http client: {}", e)))?;
        Ok(Self { http, config: Arc::new(config) })
    }

    fn api_key(&self, mode: WorkflowMode) -> Result<&str, WorkflowError> {
        let (key, var) = match mode {
            WorkflowMode::Research => (&self.config.chat_api_key, "DIFY_API_KEY1"),
            WorkflowMode::Transform => (&self.config.workflow_api_key, "DIFY_API_KEY2"),
        };
        key.as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| WorkflowError::Config(format!("{} is not configured", var)))
    }

    fn endpoint(&self, mode: WorkflowMode) -> String {
        let path = match mode {
            WorkflowMode::Research => "chat-messages",
            WorkflowMode::Transform => "workflows/run",
        };
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn payload(&self, request: &WorkflowRequest) -> Value {
        match request {
            WorkflowRequest::Research { company, query, conversation_id } => json!({
                "inputs": { "Company": company },
                "query": query,
                "response_mode": "streaming",
                "conversation_id": conversation_id.as_deref().unwrap_or_default(),
                "user": self.config.user,
            }),
            WorkflowRequest::Transform { research_out } => json!({
                "inputs": { "research_out": research_out },
                "response_mode": "streaming",
                "user": self.config.user,
            }),
        }
    }
}

#[async_trait]
impl WorkflowClient for DifyClient {
    fn check_ready(&self, mode: WorkflowMode) -> Result<(), WorkflowError> {
        self.api_key(mode).map(|_| ())
    }

    async fn open(&self, request: &WorkflowRequest) -> Result<ChunkStream, WorkflowError> {
        let mode = request.mode();
        let key = self.api_key(mode)?;
        let url = self.endpoint(mode);
        debug!(%mode, %url, "opening workflow stream");

        let response = self
            .http
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", key))
            .header(header::ACCEPT, "text/event-stream")
            .json(&self.payload(request))
            .send()
            .await
            .map_err(|e| {
                warn!(%mode, error = %e, "workflow request failed");
                WorkflowError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%mode, status = %status, body = %body, "workflow api error");
            return Err(WorkflowError::Api { status: status.as_u16(), body });
        }

        let bytes = response.bytes_stream().map_err(|e| WorkflowError::Network(e.to_string()));
        Ok(DifyEventStream::new(bytes.boxed()).boxed())
    }
}

#[cfg(test)]
#[path = "dify_tests.rs"]
mod tests;
