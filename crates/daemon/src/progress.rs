// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job progress fan-out.
//!
//! One broadcast channel per job. Subscribers receive events published
//! after they subscribe — there is no history replay. Closing the
//! channel (job reached a terminal state) ends every receiver; that is
//! the normal end of a stream, not an error.

use std::collections::HashMap;

use kiln_core::{JobId, ProgressEvent};
use parking_lot::Mutex;
use tokio::sync::broadcast;

/// Events buffered per subscriber before the slowest one starts lagging.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
pub struct ProgressHub {
    channels: Mutex<HashMap<JobId, broadcast::Sender<ProgressEvent>>>,
}

impl ProgressHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the channel for a job. Idempotent.
    pub fn register(&self, id: &JobId) {
        self.channels
            .lock()
            .entry(id.clone())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
    }

    /// Publish an event to current subscribers of the event's job.
    ///
    /// Publish order is delivery order per job; events for unknown or
    /// already-closed jobs are dropped, as are events with no listeners.
    pub fn publish(&self, event: ProgressEvent) {
        let channels = self.channels.lock();
        if let Some(tx) = channels.get(&event.job_id) {
            // send only fails when there are no receivers; that is fine
            let _ = tx.send(event);
        }
    }

    /// Subscribe to a job's events from this point onward.
    ///
    /// Returns `None` when the job is unknown or its channel already
    /// closed (a viewer connecting after Complete sees nothing).
    pub fn subscribe(&self, id: &JobId) -> Option<broadcast::Receiver<ProgressEvent>> {
        self.channels.lock().get(id).map(|tx| tx.subscribe())
    }

    /// Close a job's channel; receivers observe the stream ending.
    pub fn close(&self, id: &JobId) {
        self.channels.lock().remove(id);
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
