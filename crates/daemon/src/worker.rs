// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The build worker: one spawned task per job.
//!
//! Milestones are render (0-10), build (10-95), finalize (95-100). The
//! build step shells out to the image-preparation tool and maps its
//! `progress: N` stdout lines into the 10-95 band. The whole pipeline
//! runs under a watchdog timeout; expiry fails the job rather than
//! leaving it stuck in Building.

use std::process::Stdio;
use std::sync::Arc;

use kiln_core::{render_answer, Clock, JobId, JobStatus, ValidConfig};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::orchestrator::{JobError, Orchestrator};
use crate::store::StoreError;

#[derive(Debug, Error)]
enum BuildError {
    #[error("failed to render answer file: {0}")]
    Render(#[from] kiln_core::RenderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error("failed to launch {tool}: {source}")]
    Spawn { tool: String, source: std::io::Error },

    #[error("image tool exited with {0}")]
    ToolFailed(String),

    #[error("reading tool output: {0}")]
    Output(std::io::Error),
}

/// Drive a job from Pending to a terminal state. Never returns an
/// error to the spawner; failures are recorded on the job itself.
pub(crate) async fn run_build<C: Clock + 'static>(
    orch: Arc<Orchestrator<C>>,
    id: JobId,
    config: ValidConfig,
) {
    let timeout = orch.config().build_timeout;
    match tokio::time::timeout(timeout, build_pipeline(&orch, &id, &config)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => orch.fail_job(&id, &e.to_string()),
        Err(_) => orch.fail_job(&id, &format!("build timed out after {}s", timeout.as_secs())),
    }
}

async fn build_pipeline<C: Clock + 'static>(
    orch: &Orchestrator<C>,
    id: &JobId,
    config: &ValidConfig,
) -> Result<(), BuildError> {
    orch.transition(id, JobStatus::Rendering, "rendering answer file")?;
    let answer = render_answer(config)?;
    orch.store().save_answer(id, &answer)?;
    let answer_path = orch.store().answer_path(id);
    orch.report_progress(id, 10)?;

    if orch.is_cancelled(id) {
        return Ok(());
    }

    orch.transition(id, JobStatus::Building, "constructing installation image")?;
    let iso_path = orch.store().iso_path(id);
    let tool = orch.config().iso_tool.clone();
    let mut child = Command::new(&tool)
        .arg("--answer-file")
        .arg(&answer_path)
        .arg("--output")
        .arg(&iso_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| BuildError::Spawn { tool: tool.clone(), source })?;

    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await.map_err(BuildError::Output)? {
            if orch.is_cancelled(id) {
                if let Err(e) = child.kill().await {
                    warn!(job = %id, error = %e, "could not kill build tool");
                }
                return Ok(());
            }
            if let Some(pct) = parse_progress_line(&line) {
                // Tool progress occupies the 10-95 band.
                let mapped = 10 + (u32::from(pct.min(100)) * 85 / 100) as u8;
                orch.report_progress(id, mapped)?;
            } else if !line.trim().is_empty() {
                debug!(job = %id, line = line.trim(), "tool output");
            }
        }
    }

    let status = child.wait().await.map_err(BuildError::Output)?;
    if !status.success() {
        return Err(BuildError::ToolFailed(status.to_string()));
    }

    if orch.is_cancelled(id) {
        return Ok(());
    }

    orch.report_progress(id, 95)?;
    let artifact = orch.store().finalize(id)?;
    orch.complete_job(id, &artifact.display().to_string())?;
    Ok(())
}

/// Parse a `progress: N` line from the tool, tolerating a trailing `%`.
fn parse_progress_line(line: &str) -> Option<u8> {
    let rest = line.trim().strip_prefix("progress:")?;
    rest.trim().trim_end_matches('%').parse().ok()
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
