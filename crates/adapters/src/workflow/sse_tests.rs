// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use futures::StreamExt;

fn stream_of(parts: &[&str]) -> DifyEventStream {
    let items: Vec<Result<Bytes, WorkflowError>> =
        parts.iter().map(|p| Ok(Bytes::copy_from_slice(p.as_bytes()))).collect();
    DifyEventStream::new(futures::stream::iter(items).boxed())
}

async fn collect(stream: DifyEventStream) -> Vec<Result<Chunk, WorkflowError>> {
    stream.collect().await
}

fn texts(items: &[Result<Chunk, WorkflowError>]) -> String {
    items.iter().filter_map(|r| r.as_ref().ok()).map(|c| c.text.as_str()).collect()
}

#[tokio::test]
async fn chat_answers_concatenate_and_carry_conversation() {
    let items = collect(stream_of(&[
        "data: {\"event\":\"message\",\"answer\":\"Hel\",\"conversation_id\":\"c-1\"}\n\n",
        "data: {\"event\":\"message\",\"answer\":\"lo\",\"conversation_id\":\"c-1\"}\n\n",
        "data: {\"event\":\"message_end\",\"conversation_id\":\"c-1\"}\n\n",
    ]))
    .await;

    assert_eq!(texts(&items), "Hello");
    let last = items.last().unwrap().as_ref().unwrap();
    assert_eq!(last.conversation_id.as_deref(), Some("c-1"));
}

#[tokio::test]
async fn done_sentinel_ends_stream() {
    let items = collect(stream_of(&[
        "data: {\"answer\":\"a\"}\n",
        "data: [DONE]\n",
        "data: {\"answer\":\"ignored\"}\n",
    ]))
    .await;
    assert_eq!(texts(&items), "a");
}

#[tokio::test]
async fn multibyte_characters_split_across_reads() {
    let line = "data: {\"answer\":\"事業\"}\n".as_bytes();
    // split in the middle of the first multi-byte character
    let cut = line.iter().position(|&b| b >= 0x80).unwrap() + 1;
    let (head, tail) = line.split_at(cut);
    let parts: Vec<Result<Bytes, WorkflowError>> =
        vec![Ok(Bytes::copy_from_slice(head)), Ok(Bytes::copy_from_slice(tail))];

    let items = collect(DifyEventStream::new(futures::stream::iter(parts).boxed())).await;
    assert_eq!(texts(&items), "事業");
}

#[tokio::test]
async fn workflow_text_chunks_win_over_final_outputs() {
    let items = collect(stream_of(&[
        "data: {\"event\":\"text_chunk\",\"data\":{\"text\":\"part1 \"}}\n",
        "data: {\"event\":\"text_chunk\",\"data\":{\"text\":\"part2\"}}\n",
        "data: {\"event\":\"workflow_finished\",\"data\":{\"status\":\"succeeded\",\"outputs\":{\"text\":\"part1 part2\"}}}\n",
    ]))
    .await;
    assert_eq!(texts(&items), "part1 part2");
}

#[tokio::test]
async fn workflow_outputs_used_when_nothing_streamed() {
    let items = collect(stream_of(&[
        "data: {\"event\":\"workflow_started\",\"data\":{}}\n",
        "data: {\"event\":\"workflow_finished\",\"data\":{\"outputs\":{\"text\":\"  \",\"result\":\"final\"}}}\n",
    ]))
    .await;
    assert_eq!(texts(&items), "final");
}

#[tokio::test]
async fn workflow_outputs_fall_back_to_any_string() {
    let items = collect(stream_of(&[
        "data: {\"event\":\"workflow_finished\",\"data\":{\"outputs\":{\"count\":3,\"summary\":\"only one\"}}}\n",
    ]))
    .await;
    assert_eq!(texts(&items), "only one");
}

#[tokio::test]
async fn error_event_surfaces_as_stream_error() {
    let items = collect(stream_of(&[
        "data: {\"answer\":\"partial\"}\n",
        "data: {\"event\":\"error\",\"message\":\"quota exceeded\"}\n",
    ]))
    .await;
    assert!(matches!(&items[1], Err(WorkflowError::Stream(m)) if m == "quota exceeded"));
}

#[tokio::test]
async fn failed_workflow_is_an_error() {
    let items = collect(stream_of(&[
        "data: {\"event\":\"workflow_finished\",\"data\":{\"status\":\"failed\",\"error\":\"node crashed\"}}\n",
    ]))
    .await;
    assert!(matches!(&items[0], Err(WorkflowError::Stream(m)) if m == "node crashed"));
}

#[tokio::test]
async fn non_data_lines_and_garbage_are_skipped() {
    let items = collect(stream_of(&[
        "event: ping\n",
        ": keep-alive\n",
        "data: not-json\n",
        "data:{\"answer\":\"ok\"}",
    ]))
    .await;
    // trailing line without newline is flushed at end of stream
    assert_eq!(texts(&items), "ok");
    assert!(items.iter().all(|r| r.is_ok()));
}

#[tokio::test]
async fn transport_error_ends_stream() {
    let items: Vec<Result<Bytes, WorkflowError>> = vec![
        Ok(Bytes::from_static(b"data: {\"answer\":\"a\"}\n")),
        Err(WorkflowError::Network("reset".into())),
        Ok(Bytes::from_static(b"data: {\"answer\":\"b\"}\n")),
    ];
    let stream = DifyEventStream::new(futures::stream::iter(items).boxed());
    let items = collect(stream).await;
    assert_eq!(items.len(), 2);
    assert!(matches!(items[1], Err(WorkflowError::Network(_))));
}
