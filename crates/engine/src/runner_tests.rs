// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rd_adapters::{FakeReply, FakeWorkflowClient, RetryPolicy};
use tempfile::TempDir;

fn setup() -> (TempDir, ArtifactStore, Company) {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path());
    (dir, store, Company::parse("acme").unwrap())
}

fn settings() -> RunnerSettings {
    RunnerSettings {
        retry: RetryPolicy::new(2, Duration::from_secs(10)),
        inter_delay: Duration::from_secs(8),
        heartbeat_interval: Duration::from_secs(15),
    }
}

fn topics(indices: &[u32]) -> Vec<TopicIndex> {
    indices.iter().map(|&i| TopicIndex::new(i).unwrap()).collect()
}

#[tokio::test(start_paused = true)]
async fn writes_each_topic_and_marks_done() {
    let (_dir, store, company) = setup();
    let client = FakeWorkflowClient::new();

    run_topics(&store, &client, &company, &topics(&[2, 4]), &settings()).await.unwrap();

    let artifacts = store.read_topics(&company).unwrap();
    assert_eq!(artifacts[1].text, format!("acme: {}", TopicIndex::new(2).unwrap().title()));
    assert_eq!(artifacts[1].markdown, artifacts[1].text);
    assert_eq!(artifacts[3].text, format!("acme: {}", TopicIndex::new(4).unwrap().title()));
    assert!(!artifacts[0].is_complete());

    let markers = store.read_markers(&company);
    assert!(markers.done);
    assert_eq!(markers.running_ms, None);
    assert_eq!(markers.heartbeat_ms, None);
}

#[tokio::test(start_paused = true)]
async fn conversation_id_threads_through_topics() {
    let (_dir, store, company) = setup();
    let client = FakeWorkflowClient::new();
    client.push_reply(FakeReply::Answer {
        chunks: vec!["one".into()],
        conversation_id: Some("conv-1".into()),
    });
    client.push_reply(FakeReply::answer("two"));

    run_topics(&store, &client, &company, &topics(&[1, 2, 3]), &settings()).await.unwrap();

    let conversations: Vec<Option<String>> = client
        .calls()
        .into_iter()
        .map(|call| match call {
            WorkflowRequest::Research { conversation_id, .. } => conversation_id,
            other => panic!("unexpected request {other:?}"),
        })
        .collect();
    assert_eq!(conversations, vec![None, Some("conv-1".into()), Some("conv-1".into())]);
}

#[tokio::test(start_paused = true)]
async fn pauses_only_between_topics() {
    let (_dir, store, company) = setup();
    let client = FakeWorkflowClient::new();

    let started = Instant::now();
    run_topics(&store, &client, &company, &topics(&[1, 2, 3]), &settings()).await.unwrap();

    assert_eq!(started.elapsed(), Duration::from_secs(16));
}

#[tokio::test(start_paused = true)]
async fn exhausted_topic_aborts_run_and_keeps_earlier_topics() {
    let (_dir, store, company) = setup();
    let client = FakeWorkflowClient::new();
    client.push_reply(FakeReply::answer("first"));
    client.push_reply(FakeReply::OpenError("503".into()));
    client.push_reply(FakeReply::OpenError("503".into()));

    let err = run_topics(&store, &client, &company, &topics(&[1, 2, 3]), &settings())
        .await
        .unwrap_err();

    match err {
        RunnerError::Topic { index, source } => {
            assert_eq!(index.get(), 2);
            assert!(matches!(source, WorkflowError::RetriesExhausted { attempts: 2, .. }));
        }
        other => panic!("unexpected error {other}"),
    }
    let completed = store.completed_topics(&company).unwrap();
    assert_eq!(completed.into_iter().map(TopicIndex::get).collect::<Vec<_>>(), vec![1]);
    let markers = store.read_markers(&company);
    assert!(markers.aborted);
    assert!(!markers.done);
    assert_eq!(client.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn rerun_overwrites_content_but_keeps_original() {
    let (_dir, store, company) = setup();
    let index = TopicIndex::new(1).unwrap();
    store.write_topic(&company, index, "old", "old").unwrap();
    let client = FakeWorkflowClient::new();
    client.push_reply(FakeReply::answer("new"));

    run_topics(&store, &client, &company, &[index], &settings()).await.unwrap();

    let artifact = store.read_topic(&company, index).unwrap();
    assert_eq!(artifact.text, "new");
    assert_eq!(artifact.original_text, "old");
}

#[tokio::test(start_paused = true)]
async fn restart_clears_previous_terminal_marker() {
    let (_dir, store, company) = setup();
    store.finish_markers(&company, TerminalMarker::Aborted).unwrap();
    let client = FakeWorkflowClient::new();

    run_topics(&store, &client, &company, &topics(&[5]), &settings()).await.unwrap();

    let markers = store.read_markers(&company);
    assert!(markers.done);
    assert!(!markers.aborted);
}
