// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifact persistence.
//!
//! Each job owns one directory under the artifacts root holding the
//! rendered answer file and the produced image. Everything is keyed by
//! job id, so no locking is needed across jobs.

use std::path::{Path, PathBuf};

use kiln_core::JobId;
use thiserror::Error;

const ANSWER_FILE: &str = "answer.toml";
const ISO_FILE: &str = "install.iso";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no artifacts for job {0}")]
    NotFound(JobId),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory owned by a job, e.g. `<root>/job-abc123/`.
    pub fn job_dir(&self, id: &JobId) -> PathBuf {
        self.root.join(id.as_str())
    }

    pub fn answer_path(&self, id: &JobId) -> PathBuf {
        self.job_dir(id).join(ANSWER_FILE)
    }

    pub fn iso_path(&self, id: &JobId) -> PathBuf {
        self.job_dir(id).join(ISO_FILE)
    }

    /// Persist the rendered answer file, creating the job directory.
    pub fn save_answer(&self, id: &JobId, answer: &str) -> Result<(), StoreError> {
        let dir = self.job_dir(id);
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        let path = self.answer_path(id);
        std::fs::write(&path, answer).map_err(|e| StoreError::io(&path, e))
    }

    pub fn read_answer(&self, id: &JobId) -> Result<String, StoreError> {
        let path = self.answer_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.clone()));
        }
        std::fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))
    }

    /// Confirm the finished image exists and return its path.
    pub fn finalize(&self, id: &JobId) -> Result<PathBuf, StoreError> {
        let path = self.iso_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(path)
    }

    /// Remove a job's directory and everything in it.
    pub fn delete(&self, id: &JobId) -> Result<(), StoreError> {
        let dir = self.job_dir(id);
        if !dir.exists() {
            return Ok(());
        }
        std::fs::remove_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
