// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use kiln_core::test_support::ConfigBuilder;
use kiln_core::JobId;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::{router, Ctx};
use crate::env::Config;
use crate::orchestrator::Orchestrator;

fn test_router(dir: &std::path::Path) -> (Router, Arc<Ctx>) {
    let ctx = Arc::new(Ctx::new(Arc::new(Orchestrator::new(Config::for_dir(dir)))));
    (router(Arc::clone(&ctx)), ctx)
}

fn capped_router(dir: &std::path::Path, max_jobs: usize) -> Router {
    let mut config = Config::for_dir(dir);
    config.max_jobs = max_jobs;
    let ctx = Arc::new(Ctx::new(Arc::new(Orchestrator::new(config))));
    router(ctx)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_router(dir.path());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn installer_data_carries_the_settings_tables() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_router(dir.path());

    let response = app.oneshot(get("/api/installer/data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let settings = &body["installerSettings"];
    assert!(settings["keyboards"].as_array().unwrap().iter().any(|k| k == "en-us"));
    assert!(settings["timezones"].as_array().unwrap().iter().any(|t| t == "UTC"));
    assert!(settings["countries"].as_object().unwrap().contains_key("US"));
    assert!(settings["currentTimezone"].is_string());
    assert!(settings["currentCountry"].is_string());
}

#[tokio::test]
async fn create_iso_returns_the_job_id() {
    let dir = tempfile::tempdir().unwrap();
    let (app, ctx) = test_router(dir.path());

    let config = serde_json::to_value(ConfigBuilder::default().build()).unwrap();
    let response = app
        .oneshot(json_request(Method::POST, "/api/installer/iso", config))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["status"], true);
    let job_id = body["jobId"].as_str().unwrap();
    assert!(job_id.starts_with("job-"));
    assert!(ctx.orchestrator.job(&JobId::from_string(job_id)).is_some());
}

#[tokio::test]
async fn invalid_config_yields_422_with_field_map() {
    let dir = tempfile::tempdir().unwrap();
    let (app, ctx) = test_router(dir.path());

    let config = serde_json::to_value(ConfigBuilder::default().fqdn("nope").build()).unwrap();
    let response = app
        .oneshot(json_request(Method::POST, "/api/installer/iso", config))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["status"], false);
    assert!(body["fields"].get("fqdn").is_some());
    assert!(ctx.orchestrator.job(&JobId::from_string("job-x")).is_none());
}

#[tokio::test]
async fn capacity_exhaustion_yields_429() {
    let dir = tempfile::tempdir().unwrap();
    let app = capped_router(dir.path(), 0);

    let config = serde_json::to_value(ConfigBuilder::default().build()).unwrap();
    let response = app
        .oneshot(json_request(Method::POST, "/api/installer/iso", config))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(response).await["status"], false);
}

#[tokio::test]
async fn answer_file_roundtrip_and_404() {
    let dir = tempfile::tempdir().unwrap();
    let (app, ctx) = test_router(dir.path());

    let id = JobId::new();
    ctx.orchestrator.store().save_answer(&id, "[global]\n").unwrap();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/answer-file/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "[global]\n");

    let response = app
        .oneshot(get("/api/answer-file/job-doesnotexist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_iso_removes_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let (app, ctx) = test_router(dir.path());

    let id = JobId::new();
    ctx.orchestrator.store().save_answer(&id, "x").unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/delete-iso/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!ctx.orchestrator.store().job_dir(&id).exists());

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/delete-iso/job-doesnotexist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn device_discovery_then_answer_file_delivery() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_router(dir.path());

    let report = json!({
        "disk": "/dev/sda",
        "mgmt_nic": "eno1",
        "mgmt_mac": "aa:bb:cc:dd:ee:ff",
    });
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/device_discovery", report))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["message"].is_string());

    let request = json!({ "network_interfaces": [{ "mac": "AA:BB:CC:DD:EE:FF" }] });
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/answer_file", request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let answer = body_text(response).await;
    assert!(answer.contains("filter.ID_NET_NAME_MAC = \"*aabbccddeeff\""));

    let unknown = json!({ "network_interfaces": [{ "mac": "00:00:00:00:00:00" }] });
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/answer_file", unknown))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let empty = json!({ "network_interfaces": [] });
    let response = app
        .oneshot(json_request(Method::POST, "/api/answer_file", empty))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
