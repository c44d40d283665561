// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire format tests: length-prefix framing and JSON encoding.

use super::*;

#[test]
fn encode_returns_json_without_length_prefix() {
    let encoded = encode(&Response::Ok).unwrap();
    assert_eq!(std::str::from_utf8(&encoded).unwrap(), r#"{"type":"Ok"}"#);
}

#[tokio::test]
async fn write_message_adds_big_endian_length() {
    let mut buffer = Vec::new();
    write_message(&mut buffer, b"test data").await.unwrap();

    assert_eq!(&buffer[..4], &[0, 0, 0, 9]);
    assert_eq!(&buffer[4..], b"test data");
}

#[tokio::test]
async fn request_survives_framing() {
    let request = Request::StartRun { company: "acme".into(), topics: Some(vec![2, 4]) };
    let mut buffer = Vec::new();
    write_request(&mut buffer, &request, Duration::from_secs(1)).await.unwrap();

    let mut cursor = std::io::Cursor::new(buffer);
    let read_back = read_request(&mut cursor, Duration::from_secs(1)).await.unwrap();
    assert_eq!(read_back, request);
}

#[tokio::test]
async fn empty_stream_is_connection_closed() {
    let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::ConnectionClosed));
}

#[tokio::test]
async fn truncated_payload_is_io_error() {
    let mut cursor = std::io::Cursor::new(vec![0, 0, 0, 10, b'{']);
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::Io(_)));
}

#[tokio::test]
async fn oversized_length_is_rejected_before_reading() {
    let size = (MAX_MESSAGE_SIZE as u32 + 1).to_be_bytes();
    let mut cursor = std::io::Cursor::new(size.to_vec());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::MessageTooLarge { .. }));
}

#[tokio::test]
async fn garbage_payload_is_json_error() {
    let mut buffer = Vec::new();
    write_message(&mut buffer, b"not json").await.unwrap();
    let mut cursor = std::io::Cursor::new(buffer);
    let err = read_request(&mut cursor, Duration::from_secs(1)).await.unwrap_err();
    assert!(matches!(err, ProtocolError::Json(_)));
}

#[tokio::test(start_paused = true)]
async fn silent_peer_times_out() {
    let (mut client, _server) = tokio::io::duplex(64);
    let err = read_response(&mut client, Duration::from_millis(100)).await.unwrap_err();
    assert!(matches!(err, ProtocolError::Timeout));
}
