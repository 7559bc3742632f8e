// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Discovery callback to the answer server.
//!
//! One hand-rolled HTTP/1.1 POST over a TCP stream. The boot
//! environment carries no TLS trust store and the payload is a single
//! small JSON object, so a full HTTP client would be dead weight.

use std::time::Duration;

use kiln_core::DiscoveredHardware;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("request to {0} timed out")]
    Timeout(String),

    #[error("connect to {addr} failed: {source}")]
    Connect { addr: String, source: std::io::Error },

    #[error("request failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("server answered HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("malformed HTTP response")]
    Malformed,
}

/// POST the discovered hardware to `http://<server>/api/device_discovery`.
/// Anything but a 200 is fatal to the installation.
pub async fn post_discovery(
    server: &str,
    hardware: &DiscoveredHardware,
) -> Result<(), ReportError> {
    let body = serde_json::json!({
        "disk": hardware.disk_path,
        "mgmt_nic": hardware.nic_name,
        "mgmt_mac": hardware.nic_mac,
    })
    .to_string();
    let request = format!(
        "POST /api/device_discovery HTTP/1.1\r\nHost: {server}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    tokio::time::timeout(REQUEST_TIMEOUT, send(server, &request))
        .await
        .map_err(|_| ReportError::Timeout(server.to_string()))?
}

async fn send(addr: &str, request: &str) -> Result<(), ReportError> {
    let mut stream = TcpStream::connect(addr)
        .await
        .map_err(|source| ReportError::Connect { addr: addr.to_string(), source })?;
    stream.write_all(request.as_bytes()).await?;

    let mut reader = BufReader::new(&mut stream);

    let mut status_line = String::new();
    reader.read_line(&mut status_line).await?;
    let status: u16 = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .ok_or(ReportError::Malformed)?;

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).await?;
        if n == 0 || line == "\r\n" {
            break;
        }
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body).await?;
    }
    let body = String::from_utf8_lossy(&body).into_owned();

    if status != 200 {
        return Err(ReportError::Rejected { status, body: body.trim().to_string() });
    }
    Ok(())
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
