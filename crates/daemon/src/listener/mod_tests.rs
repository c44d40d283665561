// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use rd_adapters::{FakeProcessAdapter, FakeWorkflowClient, WorkflowMode};
use rd_core::{FakeClock, JobKind, JobState, ProposalStatus, TopicIndex};
use rd_engine::{EngineConfig, Orchestrator, RunnerCommand};
use rd_storage::ArtifactStore;
use rd_wire::{Request, Response};
use tempfile::TempDir;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use super::*;

type TestCtx = ListenCtx<FakeProcessAdapter, FakeWorkflowClient, FakeClock>;

struct Harness {
    dir: TempDir,
    store: ArtifactStore,
    process: FakeProcessAdapter,
    client: FakeWorkflowClient,
    ctx: Arc<TestCtx>,
}

fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path().join("outputs"));
    let process = FakeProcessAdapter::new();
    let client = FakeWorkflowClient::new();
    let engine = Orchestrator::new(
        store.clone(),
        process.clone(),
        client.clone(),
        FakeClock::new(),
        EngineConfig::new(RunnerCommand::new("rd-runner")),
    );
    let ctx = Arc::new(ListenCtx::new(engine, Arc::new(Notify::new())));
    Harness { dir, store, process, client, ctx }
}

fn write_topics(store: &ArtifactStore, company: &str, indices: &[u32]) {
    let company = Company::parse(company).unwrap();
    for &i in indices {
        let text = format!("topic {i} for {company}");
        store.write_topic(&company, TopicIndex::new(i).unwrap(), &text, &text).unwrap();
    }
}

async fn send(h: &Harness, request: Request) -> Response {
    handle_request(request, &h.ctx).await
}

#[tokio::test]
async fn ping_and_hello() {
    let h = harness();
    assert_eq!(send(&h, Request::Ping).await, Response::Pong);
    assert_eq!(
        send(&h, Request::Hello { version: "0.0.0".to_string() }).await,
        Response::Hello { version: PROTOCOL_VERSION.to_string() }
    );
}

#[tokio::test]
async fn invalid_company_name_is_an_error_response() {
    let h = harness();
    let response = send(&h, Request::GetStatus { company: "../etc".to_string() }).await;
    assert!(matches!(response, Response::Error { message } if message.contains("path separators")));
}

#[tokio::test]
async fn unknown_company_reports_not_found() {
    let h = harness();
    let Response::RunStatus { status } =
        send(&h, Request::GetStatus { company: "acme".to_string() }).await
    else {
        panic!("expected RunStatus");
    };
    assert_eq!(status.state, JobState::NotFound);
    assert_eq!(status.progress.completed, 0);
}

#[tokio::test]
async fn start_run_then_second_company_is_busy() {
    let h = harness();

    let started = send(&h, Request::StartRun { company: "acme".to_string(), topics: None }).await;
    assert!(
        matches!(&started, Response::Started { topics, .. } if topics == &vec![1, 2, 3, 4, 5]),
        "got {started:?}"
    );

    let busy = send(&h, Request::StartRun { company: "beta".to_string(), topics: None }).await;
    assert_eq!(busy, Response::Busy { held_by: "acme".to_string(), kind: JobKind::Research });
    assert_eq!(h.process.spawns().len(), 1);

    let Response::Status { holder, .. } = send(&h, Request::Status).await else {
        panic!("expected Status");
    };
    let holder = holder.unwrap();
    assert_eq!(holder.company, "acme");
    assert_eq!(holder.kind, JobKind::Research);
}

#[tokio::test]
async fn start_run_on_complete_company_is_already_complete() {
    let h = harness();
    write_topics(&h.store, "acme", &[1, 2, 3, 4, 5]);

    let response = send(&h, Request::StartRun { company: "acme".to_string(), topics: None }).await;
    assert_eq!(response, Response::AlreadyComplete { company: "acme".to_string() });
    assert!(h.process.spawns().is_empty());
}

#[tokio::test]
async fn rerun_with_bad_index_is_an_error() {
    let h = harness();
    let response = send(&h, Request::RerunTopic { company: "acme".to_string(), index: 9 }).await;
    assert!(matches!(response, Response::Error { .. }));
    assert!(h.process.spawns().is_empty());
}

#[tokio::test]
async fn delete_is_busy_while_running() {
    let h = harness();
    send(&h, Request::StartRun { company: "acme".to_string(), topics: None }).await;

    let response = send(&h, Request::DeleteResults { company: "acme".to_string() }).await;
    assert_eq!(response, Response::Busy { held_by: "acme".to_string(), kind: JobKind::Research });

    let other = send(&h, Request::DeleteResults { company: "beta".to_string() }).await;
    assert_eq!(other, Response::Deleted { existed: false });
}

#[tokio::test]
async fn list_companies_and_results() {
    let h = harness();
    write_topics(&h.store, "beta", &[1]);
    write_topics(&h.store, "acme", &[1, 2]);

    assert_eq!(
        send(&h, Request::ListCompanies).await,
        Response::Companies { companies: vec!["acme".to_string(), "beta".to_string()] }
    );

    let Response::Results { results } =
        send(&h, Request::GetResults { company: "acme".to_string() }).await
    else {
        panic!("expected Results");
    };
    assert_eq!(results.progress.completed, 2);
    assert!(!results.has_proposal);
}

#[tokio::test]
async fn edit_then_history_uses_rfc3339_timestamps() {
    let h = harness();
    write_topics(&h.store, "acme", &[2]);

    let edited = send(
        &h,
        Request::EditTopic {
            company: "acme".to_string(),
            index: 2,
            text: "rewritten".to_string(),
            markdown: None,
        },
    )
    .await;
    let Response::TopicEdited { topic } = edited else {
        panic!("expected TopicEdited, got {edited:?}");
    };
    assert_eq!(topic.text, "rewritten");
    assert_eq!(topic.history_count, 1);

    let Response::History { entries } =
        send(&h, Request::TopicHistory { company: "acme".to_string(), index: 2 }).await
    else {
        panic!("expected History");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "topic 2 for acme");
    assert!(entries[0].edited_at.ends_with('Z'), "got {}", entries[0].edited_at);
    assert!(chrono::DateTime::parse_from_rfc3339(&entries[0].edited_at).is_ok());
}

#[tokio::test]
async fn create_proposal_then_cached() {
    let h = harness();
    write_topics(&h.store, "acme", &[1, 2]);
    let request = Request::CreateProposal { company: "acme".to_string() };

    let Response::Proposal { text, cached } = send(&h, request.clone()).await else {
        panic!("expected Proposal");
    };
    assert!(!cached);
    assert!(text.contains("proposal[topic 1 for acme]"));

    let again = send(&h, request).await;
    assert_eq!(again, Response::Proposal { text, cached: true });
    assert_eq!(h.client.call_count(), 2);

    let Response::ProposalProgress { progress } =
        send(&h, Request::GetProposalProgress { company: "acme".to_string() }).await
    else {
        panic!("expected ProposalProgress");
    };
    assert_eq!(progress.status, ProposalStatus::Completed);
}

#[tokio::test]
async fn create_proposal_without_key_is_an_error() {
    let h = harness();
    write_topics(&h.store, "acme", &[1]);
    h.client.set_unconfigured(WorkflowMode::Transform);

    let response = send(&h, Request::CreateProposal { company: "acme".to_string() }).await;
    assert!(matches!(response, Response::Error { .. }), "got {response:?}");
    assert_eq!(h.client.call_count(), 0);
}

#[tokio::test]
async fn shutdown_notifies_the_daemon() {
    let h = harness();
    let notified = h.ctx.shutdown.notified();
    tokio::pin!(notified);

    assert_eq!(send(&h, Request::Shutdown).await, Response::ShuttingDown);
    tokio::time::timeout(Duration::from_secs(1), notified).await.unwrap();
}

#[tokio::test]
async fn serves_requests_over_the_socket_until_cancelled() {
    let h = harness();
    let socket_path = h.dir.path().join("daemon.sock");
    let unix = UnixListener::bind(&socket_path).unwrap();
    let cancel = CancellationToken::new();
    let listener = Listener::new(unix, Arc::clone(&h.ctx), cancel.clone());
    let task = tokio::spawn(listener.run());

    let stream = UnixStream::connect(&socket_path).await.unwrap();
    let (mut reader, mut writer) = stream.into_split();
    let timeout = Duration::from_secs(5);
    rd_wire::write_request(&mut writer, &Request::Ping, timeout).await.unwrap();
    let response = rd_wire::read_response(&mut reader, timeout).await.unwrap();
    assert_eq!(response, Response::Pong);

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
}
