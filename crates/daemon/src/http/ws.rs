// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Websocket progress streaming.
//!
//! The client's first text frame selects the job: `{"jobId": "..."}`.
//! The server replies with a snapshot of the job's current state, then
//! forwards hub events until the job reaches a terminal status and the
//! channel closes, at which point the socket is closed normally. An
//! unknown job id closes with policy-violation (1008). A disconnecting
//! viewer never cancels the build.

use std::borrow::Cow;
use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use kiln_core::{JobId, ProgressEvent};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use super::Ctx;

const POLICY_VIOLATION: u16 = 1008;

#[derive(Debug, Deserialize)]
struct Subscribe {
    #[serde(rename = "jobId")]
    job_id: String,
}

pub async fn iso_progress(State(ctx): State<Arc<Ctx>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| stream_job(ctx, socket))
}

async fn stream_job(ctx: Arc<Ctx>, mut socket: WebSocket) {
    let Some(id) = read_subscription(&mut socket).await else {
        let _ = reject(socket).await;
        return;
    };

    let Some(job) = ctx.orchestrator.job(&id) else {
        debug!(job = %id, "progress subscription for unknown job");
        let _ = reject(socket).await;
        return;
    };

    // Subscribe before the snapshot so no event falls in between.
    let rx = ctx.orchestrator.hub().subscribe(&id);

    let snapshot = ProgressEvent::progress(id.clone(), job.progress, job.status);
    if send_event(&mut socket, &snapshot).await.is_err() {
        return;
    }

    if let Some(mut rx) = rx {
        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Ok(event) => {
                        if send_event(&mut socket, &event).await.is_err() {
                            return;
                        }
                    }
                    // A slow viewer skips events rather than erroring.
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(job = %id, skipped, "viewer lagged behind progress stream");
                    }
                    Err(RecvError::Closed) => break,
                },
                incoming = socket.recv() => match incoming {
                    Some(Ok(_)) => continue,
                    _ => return,
                },
            }
        }
    }

    let _ = socket.send(Message::Close(None)).await;
}

async fn read_subscription(socket: &mut WebSocket) -> Option<JobId> {
    let text = match socket.recv().await? {
        Ok(Message::Text(text)) => text,
        _ => return None,
    };
    let msg: Subscribe = serde_json::from_str(&text).ok()?;
    Some(JobId::from_string(msg.job_id))
}

async fn send_event(socket: &mut WebSocket, event: &ProgressEvent) -> Result<(), axum::Error> {
    socket.send(Message::Text(event.to_wire().to_string())).await
}

async fn reject(mut socket: WebSocket) -> Result<(), axum::Error> {
    socket
        .send(Message::Close(Some(CloseFrame {
            code: POLICY_VIOLATION,
            reason: Cow::Borrowed("unknown job"),
        })))
        .await
}

#[cfg(test)]
#[path = "ws_tests.rs"]
mod tests;
