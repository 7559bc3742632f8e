// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boot-time discovery intake and cached answer delivery.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::{Ctx, Error};
use crate::discovery::DiscoveryReport;

/// Intake for boot-time discovery reports.
///
/// `mgmt_mac` is optional in the body shape but required here: the MAC
/// keys the cached answer file, so a report without one cannot be
/// stored or served later and is rejected with 400.
pub async fn device_discovery(
    State(ctx): State<Arc<Ctx>>,
    Json(report): Json<DiscoveryReport>,
) -> Result<Json<serde_json::Value>, Error> {
    ctx.discovery.record(&report)?;
    Ok(Json(json!({ "message": "device discovery data received" })))
}

/// The installer posts its interface list; the first interface's MAC
/// selects the cached answer.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub network_interfaces: Vec<InterfaceInfo>,
}

#[derive(Debug, Deserialize)]
pub struct InterfaceInfo {
    #[serde(default)]
    pub mac: Option<String>,
}

pub async fn answer_file(
    State(ctx): State<Arc<Ctx>>,
    Json(request): Json<AnswerRequest>,
) -> Result<String, Error> {
    let mac = request
        .network_interfaces
        .first()
        .and_then(|i| i.mac.as_deref())
        .ok_or_else(|| Error::BadRequest("request carried no interface MAC".to_string()))?;
    ctx.discovery.answer_for(mac).ok_or(Error::NotFound)
}
