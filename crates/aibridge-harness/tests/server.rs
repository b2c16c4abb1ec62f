//! HTTP surface of the development server

use aibridge_core::{ErrorReport, HostErrorDispatcher, Variant};
use aibridge_harness::server::build_app;
use aibridge_harness::{HarnessConfig, HarnessState};
use aibridge_resources::DirectoryAssets;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::io::{Cursor, Write};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

#[derive(Debug, Default)]
struct RecordingHost {
    reports: Mutex<Vec<ErrorReport>>,
}

impl HostErrorDispatcher for RecordingHost {
    fn dispatch_error(&self, report: ErrorReport) {
        self.reports.lock().push(report);
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    app: Router,
    host: Arc<RecordingHost>,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("labels.txt"), b"rose\ntulip\n").unwrap();

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("model.json", zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(br#"{"labels":["rose","tulip"]}"#).unwrap();
    let archive = writer.finish().unwrap().into_inner();
    std::fs::write(dir.path().join("flowers.zip"), archive).unwrap();

    let host = Arc::new(RecordingHost::default());
    let config = HarnessConfig {
        variant: Variant::PersonalImageClassifier,
        assets_dir: dir.path().to_path_buf(),
        model_path: Some("flowers.mdl".to_string()),
        ..Default::default()
    };
    let assets = Arc::new(DirectoryAssets::new(dir.path()));
    let state = HarnessState::with_assets(config, assets, host.clone()).unwrap();

    Fixture {
        _dir: dir,
        app: build_app(state),
        host,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_bootstrap_page_is_served() {
    let fx = fixture();
    let (status, body) = send(&fx.app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("PersonalImageClassifier"));
    assert!(fx.host.reports.lock().is_empty());
}

#[tokio::test]
async fn test_resource_from_archive() {
    let fx = fixture();
    let (status, body) = send(
        &fx.app,
        get("/resource?url=appinventor%3Apersonal-image-classifier%2Fpersonal%2Fmodel.json"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, br#"{"labels":["rose","tulip"]}"#.to_vec());
}

#[tokio::test]
async fn test_transfer_resource_and_missing_entry() {
    let fx = fixture();
    let (status, body) = send(
        &fx.app,
        get("/resource?url=appinventor%3Apersonal-image-classifier%2Ftransfer%2Flabels.txt"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"rose\ntulip\n".to_vec());

    let (status, _) = send(
        &fx.app,
        get("/resource?url=appinventor%3Apersonal-image-classifier%2Fpersonal%2Fabsent.bin"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_message_then_labels() {
    let fx = fixture();
    let (status, _) = send(
        &fx.app,
        json_request(
            "POST",
            "/message",
            json!({"functionCall": "ready", "args": "[\"rose\",\"tulip\"]"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&fx.app, get("/labels")).await;
    let labels: Vec<String> = serde_json::from_slice(&body).unwrap();
    assert_eq!(labels, vec!["rose", "tulip"]);

    let (status, _) = send(
        &fx.app,
        json_request("POST", "/message", json!({"functionCall": "error", "args": "oops"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_model_path_is_rejected() {
    let fx = fixture();
    let (status, body) = send(
        &fx.app,
        json_request("PUT", "/model", json!({"path": "flowers.zip"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["code"], -8);
    assert_eq!(body["model_path"], "flowers.mdl");
    assert_eq!(fx.host.reports.lock().len(), 1);
}

#[tokio::test]
async fn test_metrics_count_served_requests() {
    let fx = fixture();
    send(
        &fx.app,
        get("/resource?url=appinventor%3Apersonal-image-classifier%2Ftransfer%2Flabels.txt"),
    )
    .await;

    let (_, body) = send(&fx.app, get("/metrics")).await;
    let snapshot: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(snapshot["requests_resolved"], 1);
    assert_eq!(snapshot["bytes_served"], 11);
}

#[tokio::test]
async fn test_cors_allows_only_local_origins() {
    let fx = fixture();
    let from = |origin: &str| {
        Request::builder()
            .uri("/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    };

    let response = fx.app.clone().oneshot(from("http://localhost:3000")).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );

    let response = fx.app.clone().oneshot(from("http://evil.example")).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
