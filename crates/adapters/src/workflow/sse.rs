// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SSE parser for Dify streaming responses.
//!
//! Converts a raw byte stream into [`Chunk`] values. Lines are split on raw
//! bytes before UTF-8 decoding, so multi-byte characters that straddle network
//! reads survive intact.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::{BoxStream, Stream};
use serde_json::Value;
use tracing::debug;

use super::{Chunk, WorkflowError};

/// Output keys checked, in order, on `workflow_finished`
const OUTPUT_KEYS: [&str; 4] = ["text", "answer", "output", "result"];

pub(crate) struct DifyEventStream {
    inner: BoxStream<'static, Result<Bytes, WorkflowError>>,
    buffer: Vec<u8>,
    eof: bool,
    finished: bool,
    /// Whether any incremental text was seen; final outputs are a fallback only
    streamed_text: bool,
}

impl DifyEventStream {
    pub(crate) fn new(inner: BoxStream<'static, Result<Bytes, WorkflowError>>) -> Self {
        Self { inner, buffer: Vec::new(), eof: false, finished: false, streamed_text: false }
    }

    fn next_line(&mut self) -> Option<String> {
        let pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.buffer.drain(..=pos).collect();
        Some(String::from_utf8_lossy(&line).trim().to_string())
    }

    /// Interpret one SSE line. `None` means "nothing to emit".
    fn parse_line(&mut self, line: &str) -> Option<Result<Chunk, WorkflowError>> {
        // Non-data lines ("event:", "id:", "retry:", blank separators) carry nothing for us
        let data = line.strip_prefix("data:")?.trim();
        if data.is_empty() {
            return None;
        }
        if data == "[DONE]" {
            self.finished = true;
            return None;
        }
        let value: Value = match serde_json::from_str(data) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "skipping undecodable stream event");
                return None;
            }
        };
        decode_event(&value, &mut self.streamed_text).transpose()
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// First usable string among a finished workflow's outputs
fn pick_output(outputs: &Value) -> Option<String> {
    let non_blank = |s: &&str| !s.trim().is_empty();
    OUTPUT_KEYS
        .iter()
        .find_map(|key| str_field(outputs, key).filter(non_blank))
        .or_else(|| outputs.as_object()?.values().filter_map(Value::as_str).find(non_blank))
        .map(str::to_string)
}

fn decode_event(value: &Value, streamed_text: &mut bool) -> Result<Option<Chunk>, WorkflowError> {
    let event = str_field(value, "event").unwrap_or_default();
    let data = value.get("data").unwrap_or(&Value::Null);

    let text = match event {
        "error" => {
            let message = str_field(value, "message")
                .or_else(|| str_field(value, "code"))
                .unwrap_or("unknown error");
            return Err(WorkflowError::Stream(message.to_string()));
        }
        "text_chunk" => str_field(data, "text").map(str::to_string),
        "workflow_finished" => {
            if str_field(data, "status") == Some("failed") {
                let message = str_field(data, "error").unwrap_or("workflow failed");
                return Err(WorkflowError::Stream(message.to_string()));
            }
            if *streamed_text {
                None
            } else {
                data.get("outputs").and_then(pick_output)
            }
        }
        // message / agent_message / message_end and friends
        _ => str_field(value, "answer").map(str::to_string),
    };

    let text = text.unwrap_or_default();
    if !text.is_empty() {
        *streamed_text = true;
    }
    let conversation_id =
        str_field(value, "conversation_id").filter(|id| !id.is_empty()).map(str::to_string);

    if text.is_empty() && conversation_id.is_none() {
        return Ok(None);
    }
    Ok(Some(Chunk { text, conversation_id }))
}

impl Stream for DifyEventStream {
    type Item = Result<Chunk, WorkflowError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            while !this.finished {
                let Some(line) = this.next_line() else { break };
                if let Some(item) = this.parse_line(&line) {
                    return Poll::Ready(Some(item));
                }
            }
            if this.finished || this.eof {
                return Poll::Ready(None);
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => this.buffer.extend_from_slice(&bytes),
                Poll::Ready(Some(Err(e))) => {
                    this.finished = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    // Flush a trailing line that had no newline
                    this.eof = true;
                    if !this.buffer.is_empty() {
                        this.buffer.push(b'\n');
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
#[path = "sse_tests.rs"]
mod tests;
