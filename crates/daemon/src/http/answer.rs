// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serves the rendered answer file of an existing job.

use std::sync::Arc;

use axum::extract::{Path, State};
use kiln_core::JobId;

use super::{Ctx, Error};

pub async fn answer_file(
    State(ctx): State<Arc<Ctx>>,
    Path(job_id): Path<String>,
) -> Result<String, Error> {
    let id = JobId::from_string(job_id);
    Ok(ctx.orchestrator.store().read_answer(&id)?)
}
