// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP and websocket surface, one handler module per concern.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use kiln_core::ValidationErrors;
use serde_json::json;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::discovery::{DiscoveryError, DiscoveryRegistry};
use crate::orchestrator::{CreateError, JobError, Orchestrator};
use crate::store::StoreError;

pub mod answer;
pub mod device;
pub mod health;
pub mod installer;
pub mod ws;

/// Shared handler state.
pub struct Ctx {
    pub orchestrator: Arc<Orchestrator>,
    pub discovery: DiscoveryRegistry,
}

impl Ctx {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator, discovery: DiscoveryRegistry::default() }
    }
}

pub fn router(ctx: Arc<Ctx>) -> Router {
    Router::new()
        .route("/api/installer/data", get(installer::data))
        .route("/api/installer/iso", post(installer::create_iso))
        .route("/api/answer-file/:job_id", get(answer::answer_file))
        .route("/api/delete-iso/:job_id", delete(installer::delete_iso))
        .route("/api/ws/iso", get(ws::iso_progress))
        .route("/api/device_discovery", post(device::device_discovery))
        .route("/api/answer_file", post(device::answer_file))
        .route("/health", get(health::health))
        .layer(
            CorsLayer::new()
                .allow_headers(Any)
                .allow_methods(Any)
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Handler-level failures mapped onto status codes and the
/// `{status: false, error}` body shape.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("maximum number of concurrent jobs reached")]
    AtCapacity,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("internal server error")]
    Internal,
}

impl From<CreateError> for Error {
    fn from(e: CreateError) -> Self {
        match e {
            CreateError::Validation(errors) => Error::Validation(errors),
            CreateError::AtCapacity(_) => Error::AtCapacity,
        }
    }
}

impl From<JobError> for Error {
    fn from(e: JobError) -> Self {
        match e {
            JobError::NotFound(_) | JobError::Store(StoreError::NotFound(_)) => Error::NotFound,
            JobError::Transition(_) | JobError::Store(_) => Error::Internal,
        }
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Error::NotFound,
            StoreError::Io { .. } => Error::Internal,
        }
    }
}

impl From<DiscoveryError> for Error {
    fn from(e: DiscoveryError) -> Self {
        match e {
            DiscoveryError::MissingMac => Error::BadRequest(e.to_string()),
            DiscoveryError::Invalid(_) | DiscoveryError::Render(_) => Error::Internal,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::AtCapacity => StatusCode::TOO_MANY_REQUESTS,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = match &self {
            Error::Validation(errors) => json!({
                "status": false,
                "error": self.to_string(),
                "fields": errors.0,
            }),
            _ => json!({ "status": false, "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
