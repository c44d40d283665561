// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn client(chat: Option<&str>, workflow: Option<&str>) -> DifyClient {
    DifyClient::new(DifyConfig {
        base_url: "https://dify.example/v1/".to_string(),
        chat_api_key: chat.map(String::from),
        workflow_api_key: workflow.map(String::from),
        ..DifyConfig::default()
    })
    .unwrap()
}

#[test]
fn endpoints_join_base_url() {
    let client = client(None, None);
    assert_eq!(client.endpoint(WorkflowMode::Research), "https://dify.example/v1/chat-messages");
    assert_eq!(client.endpoint(WorkflowMode::Transform), "https://dify.example/v1/workflows/run");
}

#[test]
fn readiness_follows_configured_keys() {
    let client = client(Some("app-chat"), Some(""));
    assert!(client.check_ready(WorkflowMode::Research).is_ok());
    let err = client.check_ready(WorkflowMode::Transform).unwrap_err();
    assert!(err.to_string().contains("DIFY_API_KEY2"));
    assert!(!err.is_retryable());
}

#[test]
fn research_payload_threads_conversation() {
    let client = client(Some("k"), None);
    let request = WorkflowRequest::Research {
        company: "acme".into(),
        query: "世間の評価".into(),
        conversation_id: Some("conv-9".into()),
    };
    let payload = client.payload(&request);
    assert_eq!(payload["inputs"]["Company"], "acme");
    assert_eq!(payload["query"], "世間の評価");
    assert_eq!(payload["conversation_id"], "conv-9");
    assert_eq!(payload["response_mode"], "streaming");
    assert_eq!(payload["user"], "REACHA_agent");
}

#[test]
fn first_research_question_sends_empty_conversation() {
    let client = client(Some("k"), None);
    let request = WorkflowRequest::Research {
        company: "acme".into(),
        query: "q".into(),
        conversation_id: None,
    };
    assert_eq!(client.payload(&request)["conversation_id"], "");
}

#[test]
fn transform_payload_carries_research_out() {
    let client = client(None, Some("k"));
    let payload = client.payload(&WorkflowRequest::Transform { research_out: "body".into() });
    assert_eq!(payload["inputs"]["research_out"], "body");
    assert!(payload.get("query").is_none());
}

#[tokio::test]
async fn open_without_key_fails_before_network() {
    let client = client(None, None);
    let request = WorkflowRequest::Transform { research_out: "x".into() };
    assert!(matches!(client.open(&request).await, Err(WorkflowError::Config(_))));
}
