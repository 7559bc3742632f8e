// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kiln_core::DiscoveredHardware;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::{post_discovery, ReportError};

fn hardware() -> DiscoveredHardware {
    DiscoveredHardware {
        disk_path: "/dev/sda".to_string(),
        nic_name: "eno1".to_string(),
        nic_mac: "aa:bb:cc:dd:ee:ff".to_string(),
    }
}

/// One-shot server: accepts a single connection, captures the request,
/// answers with the canned response.
async fn one_shot_server(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let n = stream.read(&mut buf).await.unwrap();
        stream.write_all(response.as_bytes()).await.unwrap();
        String::from_utf8_lossy(&buf[..n]).into_owned()
    });
    (addr, handle)
}

#[tokio::test]
async fn accepted_callback_sends_the_hardware_payload() {
    let (addr, handle) =
        one_shot_server("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok").await;

    post_discovery(&addr, &hardware()).await.unwrap();

    let request = handle.await.unwrap();
    assert!(request.starts_with("POST /api/device_discovery HTTP/1.1\r\n"));
    let body = request.split("\r\n\r\n").nth(1).unwrap();
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["disk"], "/dev/sda");
    assert_eq!(json["mgmt_nic"], "eno1");
    assert_eq!(json["mgmt_mac"], "aa:bb:cc:dd:ee:ff");
}

#[tokio::test]
async fn non_200_is_rejected_with_status_and_body() {
    let (addr, _handle) =
        one_shot_server("HTTP/1.1 404 Not Found\r\nContent-Length: 7\r\n\r\nno luck").await;

    let err = post_discovery(&addr, &hardware()).await.unwrap_err();
    match err {
        ReportError::Rejected { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "no luck");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_connect_error() {
    // bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let err = post_discovery(&addr, &hardware()).await.unwrap_err();
    assert!(matches!(err, ReportError::Connect { .. }));
}

#[tokio::test]
async fn garbage_response_is_malformed() {
    let (addr, _handle) = one_shot_server("not http at all\r\n\r\n").await;
    let err = post_discovery(&addr, &hardware()).await.unwrap_err();
    assert!(matches!(err, ReportError::Malformed));
}
