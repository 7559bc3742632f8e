// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installer settings and build submission handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kiln_core::{InstallConfig, JobId};
use serde_json::json;

use super::{Ctx, Error};
use crate::installer_data;

/// Tables for the installer settings page.
pub async fn data() -> Json<serde_json::Value> {
    Json(json!({ "installerSettings": installer_data::installer_settings() }))
}

/// Submit a configuration; returns the job id immediately while the
/// build runs in the background.
pub async fn create_iso(
    State(ctx): State<Arc<Ctx>>,
    Json(config): Json<InstallConfig>,
) -> Result<impl IntoResponse, Error> {
    let id = ctx.orchestrator.create_job(config)?;
    Ok((StatusCode::CREATED, Json(json!({ "status": true, "jobId": id }))))
}

/// Retire a job and its artifacts. Cancels the build if still running.
pub async fn delete_iso(
    State(ctx): State<Arc<Ctx>>,
    Path(job_id): Path<String>,
) -> Result<Json<serde_json::Value>, Error> {
    let id = JobId::from_string(job_id);
    ctx.orchestrator.delete_job(&id)?;
    Ok(Json(json!({ "status": true })))
}
