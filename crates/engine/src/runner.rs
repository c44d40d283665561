// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The runner's topic loop.
//!
//! Runs inside the `rd-runner` process. Topics run strictly one after another
//! and share one research conversation. The runner is the only writer of the
//! company's marker files while it is alive.

use std::time::Duration;

use rd_adapters::{collect_with_retry, WorkflowClient, WorkflowError, WorkflowRequest};
use rd_core::{Company, TerminalMarker, TopicIndex};
use rd_storage::{ArtifactStore, StoreError};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::config::RunnerSettings;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("topic {index} failed: {source}")]
    Topic {
        index: TopicIndex,
        #[source]
        source: WorkflowError,
    },
}

fn spawn_heartbeat(store: ArtifactStore, company: Company, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            if let Err(e) = store.touch_heartbeat(&company) {
                warn!(%company, error = %e, "heartbeat write failed");
            }
        }
    })
}

/// Research `topics` for `company` and persist each answer as it completes.
///
/// Leaves `.done` when every topic succeeded and `.aborted` otherwise.
/// Topics finished before a failure stay on disk.
pub async fn run_topics<W: WorkflowClient>(
    store: &ArtifactStore,
    client: &W,
    company: &Company,
    topics: &[TopicIndex],
    settings: &RunnerSettings,
) -> Result<(), RunnerError> {
    store.init_markers(company)?;
    let heartbeat = spawn_heartbeat(store.clone(), company.clone(), settings.heartbeat_interval);
    info!(%company, topics = topics.len(), "research run started");

    let result = research_sequence(store, client, company, topics, settings).await;

    heartbeat.abort();
    let _ = heartbeat.await;

    let outcome = match &result {
        Ok(()) => TerminalMarker::Done,
        Err(e) => {
            error!(%company, error = %e, "research run aborted");
            TerminalMarker::Aborted
        }
    };
    store.finish_markers(company, outcome)?;
    info!(%company, %outcome, "research run finished");
    result
}

async fn research_sequence<W: WorkflowClient>(
    store: &ArtifactStore,
    client: &W,
    company: &Company,
    topics: &[TopicIndex],
    settings: &RunnerSettings,
) -> Result<(), RunnerError> {
    let mut conversation_id: Option<String> = None;
    for (position, &index) in topics.iter().enumerate() {
        if position > 0 {
            tokio::time::sleep(settings.inter_delay).await;
        }
        info!(%company, topic = %index, title = index.title(), "researching topic");

        let request = WorkflowRequest::Research {
            company: company.to_string(),
            query: index.title().to_string(),
            conversation_id: conversation_id.clone(),
        };
        let collected = collect_with_retry(client, &request, settings.retry)
            .await
            .map_err(|source| RunnerError::Topic { index, source })?;

        store.write_topic(company, index, &collected.text, &collected.text)?;
        info!(
            %company,
            topic = %index,
            chars = collected.text.chars().count(),
            attempts = collected.attempts,
            "topic saved"
        );
        if collected.conversation_id.is_some() {
            conversation_id = collected.conversation_id;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
