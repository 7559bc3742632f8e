// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build-job state machine.
//!
//! A job moves `Pending → Rendering → Building → {Complete | Failed}`,
//! with `Cancelled` reachable from any non-terminal state. Transitions
//! are monotonic: once a status has been left it is never re-entered,
//! and terminal states absorb.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::Clock;
use crate::id::JobId;

/// Status of a build job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Rendering,
    Building,
    Complete,
    Failed,
    Cancelled,
}

crate::simple_display! {
    JobStatus {
        Pending => "pending",
        Rendering => "rendering",
        Building => "building",
        Complete => "complete",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

impl JobStatus {
    /// Terminal states absorb: no transition leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed | JobStatus::Cancelled)
    }

    /// Position in the forward path. Terminal states share the top rank
    /// so the monotonicity check reduces to a comparison.
    fn rank(&self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Rendering => 1,
            JobStatus::Building => 2,
            JobStatus::Complete | JobStatus::Failed | JobStatus::Cancelled => 3,
        }
    }
}

/// Rejected state-machine transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("job {id} is already {status} (terminal)")]
    Terminal { id: JobId, status: JobStatus },

    #[error("job {id} cannot move backwards from {from} to {to}")]
    Backwards { id: JobId, from: JobStatus, to: JobStatus },

    #[error("job {id} progress may not decrease ({from} -> {to})")]
    ProgressDecreased { id: JobId, from: u8, to: u8 },
}

/// One asynchronous request to produce an installation image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildJob {
    pub id: JobId,
    pub status: JobStatus,
    /// 0-100, monotonic non-decreasing while Building.
    pub progress: u8,
    pub status_message: String,
    pub created_at_ms: u64,
    /// Artifact directory key, set when the build completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_ref: Option<String>,
    /// Present iff `status` is Failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl BuildJob {
    pub fn new(id: JobId, clock: &impl Clock) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            progress: 0,
            status_message: "queued".to_string(),
            created_at_ms: clock.epoch_ms(),
            artifact_ref: None,
            error_detail: None,
        }
    }

    /// Move to a later status. Terminal states reject everything;
    /// earlier or equal ranks reject (no re-entry).
    pub fn advance(&mut self, to: JobStatus) -> Result<(), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::Terminal { id: self.id.clone(), status: self.status });
        }
        if to.rank() <= self.status.rank() {
            return Err(TransitionError::Backwards {
                id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Record progress, clamped to 100, rejecting decreases.
    pub fn set_progress(&mut self, progress: u8) -> Result<(), TransitionError> {
        let progress = progress.min(100);
        if progress < self.progress {
            return Err(TransitionError::ProgressDecreased {
                id: self.id.clone(),
                from: self.progress,
                to: progress,
            });
        }
        self.progress = progress;
        Ok(())
    }

    /// Transition to Failed recording the failure detail.
    pub fn fail(&mut self, detail: impl Into<String>) -> Result<(), TransitionError> {
        self.advance(JobStatus::Failed)?;
        self.error_detail = Some(detail.into());
        Ok(())
    }

    /// Advisory cancellation; only meaningful before a terminal state.
    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.advance(JobStatus::Cancelled)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
