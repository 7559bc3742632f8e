// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build-job orchestration.
//!
//! The orchestrator owns the job registry. A submission is validated
//! synchronously; on success a job is stored as Pending and a worker
//! task is spawned, without blocking the caller. Workers report back
//! through the orchestrator, which applies the state machine and
//! publishes progress events. There is no cross-job locking — jobs
//! share nothing but the artifact store, which is keyed by job id.

use std::collections::HashMap;
use std::sync::Arc;

use kiln_core::{
    BuildJob, Clock, InstallConfig, JobId, JobStatus, ProgressEvent, SystemClock, TransitionError,
    ValidationErrors,
};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{info, warn};

use crate::env::Config;
use crate::progress::ProgressHub;
use crate::store::{ArtifactStore, StoreError};
use crate::worker;

/// Why a submission did not become a job.
#[derive(Debug, Error)]
pub enum CreateError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("maximum number of concurrent jobs reached ({0})")]
    AtCapacity(usize),
}

/// Failures against an existing job.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("unknown job {0}")]
    NotFound(JobId),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Orchestrator<C: Clock = SystemClock> {
    jobs: Mutex<HashMap<JobId, BuildJob>>,
    hub: ProgressHub,
    store: ArtifactStore,
    config: Config,
    clock: C,
}

impl Orchestrator<SystemClock> {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock + 'static> Orchestrator<C> {
    pub fn with_clock(config: Config, clock: C) -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            hub: ProgressHub::new(),
            store: ArtifactStore::new(&config.artifacts_dir),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn hub(&self) -> &ProgressHub {
        &self.hub
    }

    /// Validate and, on success, register a Pending job and start its
    /// worker. Returns immediately; no job is created on failure.
    pub fn create_job(self: &Arc<Self>, config: InstallConfig) -> Result<JobId, CreateError> {
        let valid = kiln_core::validate(config)?;

        let id = JobId::new();
        {
            let mut jobs = self.jobs.lock();
            let active = jobs.values().filter(|j| !j.is_terminal()).count();
            if active >= self.config.max_jobs {
                return Err(CreateError::AtCapacity(self.config.max_jobs));
            }
            jobs.insert(id.clone(), BuildJob::new(id.clone(), &self.clock));
        }
        self.hub.register(&id);
        info!(job = %id, fqdn = %valid.identity().fqdn, "job created");

        let orch = Arc::clone(self);
        let job_id = id.clone();
        tokio::spawn(async move {
            worker::run_build(orch, job_id, valid).await;
        });

        Ok(id)
    }

    /// Snapshot of a job's current state.
    pub fn job(&self, id: &JobId) -> Option<BuildJob> {
        self.jobs.lock().get(id).cloned()
    }

    pub fn is_cancelled(&self, id: &JobId) -> bool {
        self.jobs
            .lock()
            .get(id)
            .is_some_and(|j| j.status == JobStatus::Cancelled)
    }

    /// Move a job forward and announce the new status.
    pub(crate) fn transition(
        &self,
        id: &JobId,
        to: JobStatus,
        message: &str,
    ) -> Result<(), JobError> {
        {
            let mut jobs = self.jobs.lock();
            let job = jobs.get_mut(id).ok_or_else(|| JobError::NotFound(id.clone()))?;
            job.advance(to)?;
            job.status_message = message.to_string();
        }
        self.hub.publish(ProgressEvent::status(id.clone(), to, message));
        if to.is_terminal() {
            self.hub.close(id);
        }
        Ok(())
    }

    /// Record progress and announce it.
    pub(crate) fn report_progress(&self, id: &JobId, progress: u8) -> Result<(), JobError> {
        let status = {
            let mut jobs = self.jobs.lock();
            let job = jobs.get_mut(id).ok_or_else(|| JobError::NotFound(id.clone()))?;
            job.set_progress(progress)?;
            job.status
        };
        self.hub.publish(ProgressEvent::progress(id.clone(), progress, status));
        Ok(())
    }

    /// Mark a job Failed, keeping the detail and emitting an Error
    /// event. A no-op for jobs already terminal (e.g. cancelled while
    /// the worker was mid-step).
    pub(crate) fn fail_job(&self, id: &JobId, detail: &str) {
        {
            let mut jobs = self.jobs.lock();
            let Some(job) = jobs.get_mut(id) else { return };
            if job.is_terminal() {
                return;
            }
            if let Err(e) = job.fail(detail) {
                warn!(job = %id, error = %e, "failed to mark job as failed");
                return;
            }
        }
        warn!(job = %id, detail, "job failed");
        self.hub.publish(ProgressEvent::error(id.clone(), detail));
        self.hub.close(id);
    }

    /// Mark a job Complete with its artifact reference.
    pub(crate) fn complete_job(&self, id: &JobId, artifact_ref: &str) -> Result<(), JobError> {
        {
            let mut jobs = self.jobs.lock();
            let job = jobs.get_mut(id).ok_or_else(|| JobError::NotFound(id.clone()))?;
            job.advance(JobStatus::Complete)?;
            job.set_progress(100)?;
            job.status_message = "complete".to_string();
            job.artifact_ref = Some(artifact_ref.to_string());
        }
        info!(job = %id, artifact = artifact_ref, "job complete");
        self.hub
            .publish(ProgressEvent::progress(id.clone(), 100, JobStatus::Complete));
        self.hub.close(id);
        Ok(())
    }

    /// Advisory cancellation: the job is marked Cancelled and its
    /// channel closed; a running worker notices between milestones.
    pub fn cancel_job(&self, id: &JobId) -> Result<(), JobError> {
        {
            let mut jobs = self.jobs.lock();
            let job = jobs.get_mut(id).ok_or_else(|| JobError::NotFound(id.clone()))?;
            job.cancel()?;
            job.status_message = "cancelled".to_string();
        }
        info!(job = %id, "job cancelled");
        self.hub
            .publish(ProgressEvent::status(id.clone(), JobStatus::Cancelled, "cancelled"));
        self.hub.close(id);
        Ok(())
    }

    /// Retire a job: cancel if still running, delete its artifacts,
    /// and drop it from the registry.
    pub fn delete_job(&self, id: &JobId) -> Result<(), JobError> {
        let had_artifacts = self.store.job_dir(id).exists();
        let existed = {
            let mut jobs = self.jobs.lock();
            match jobs.get_mut(id) {
                Some(job) => {
                    if !job.is_terminal() {
                        job.cancel()?;
                    }
                    jobs.remove(id);
                    true
                }
                None => false,
            }
        };
        if !existed && !had_artifacts {
            return Err(JobError::NotFound(id.clone()));
        }
        self.hub.close(id);
        self.store.delete(id)?;
        info!(job = %id, "job deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
