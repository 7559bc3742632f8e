// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress events streamed to build-job subscribers.
//!
//! Events are ephemeral: they are fanned out to connected viewers and
//! never persisted. The serialized shape matches the websocket
//! contract: `{"data": {"type": "progress", "progress": 42, ...}}`.

use serde::{Deserialize, Serialize};

use crate::id::JobId;
use crate::job::JobStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Progress,
    Status,
    Error,
}

crate::simple_display! {
    EventKind {
        Progress => "progress",
        Status => "status",
        Error => "error",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(skip)]
    pub job_id: JobId,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProgressEvent {
    pub fn progress(job_id: JobId, progress: u8, status: JobStatus) -> Self {
        Self {
            job_id,
            kind: EventKind::Progress,
            progress: Some(progress),
            status: Some(status),
            message: None,
        }
    }

    pub fn status(job_id: JobId, status: JobStatus, message: impl Into<String>) -> Self {
        Self {
            job_id,
            kind: EventKind::Status,
            progress: None,
            status: Some(status),
            message: Some(message.into()),
        }
    }

    pub fn error(job_id: JobId, message: impl Into<String>) -> Self {
        Self {
            job_id,
            kind: EventKind::Error,
            progress: None,
            status: Some(JobStatus::Failed),
            message: Some(message.into()),
        }
    }

    /// Wrap in the `{"data": ...}` envelope used on the wire.
    pub fn to_wire(&self) -> serde_json::Value {
        serde_json::json!({ "data": self })
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
