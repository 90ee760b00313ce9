use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use fundledger_core::snapshots::SchemaVariant;
use fundledger_server::{api::app_router, build_state, config::Config};

const BOUNDARY: &str = "fundledger-test-boundary";

fn test_config(root: &Path, schema: SchemaVariant) -> Config {
    let upload_dir = root.join("uploads");
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        master_file: upload_dir.join("master_holdings.xlsx"),
        upload_dir,
        schema,
        timezone: chrono_tz::UTC,
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        max_upload_bytes: 20 * 1024 * 1024,
        sqlite_sink_path: None,
        document_sink_dir: None,
    }
}

async fn app_with(config: &Config) -> Router {
    let state = build_state(config).await.unwrap();
    app_router(state, config)
}

async fn app(schema: SchemaVariant) -> (TempDir, Router) {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path(), schema);
    let router = app_with(&config).await;
    (tmp, router)
}

/// Vendor export: header row, four boilerplate rows, then data with the
/// name in column 0, shares in column 6 and weight in column 7.
fn holdings_export(rows: &[(&str, f64, f64)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name("holdings").unwrap();
    sheet.write_string(0, 0, "Holdings export").unwrap();
    for preamble in 1..5u32 {
        sheet.write_string(preamble, 0, "Fund notice").unwrap();
    }
    for (idx, (name, shares, weight)) in rows.iter().enumerate() {
        let row = 5 + idx as u32;
        sheet.write_string(row, 0, *name).unwrap();
        sheet.write_string(row, 3, "USD").unwrap();
        sheet.write_number(row, 6, *shares).unwrap();
        sheet.write_number(row, 7, *weight).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

fn multipart_body(field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(field: &str, file_name: &str, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/holdings/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, file_name, bytes)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn healthz_works() {
    let (_tmp, app) = app(SchemaVariant::Full).await;

    let response = app.oneshot(get("/api/v1/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readyz_reports_missing_upload_dir() {
    let (tmp, app) = app(SchemaVariant::Full).await;

    let response = app.clone().oneshot(get("/api/v1/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    std::fs::remove_dir_all(tmp.path().join("uploads")).unwrap();
    let response = app.oneshot(get("/api/v1/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn master_is_not_found_before_first_upload() {
    let (_tmp, app) = app(SchemaVariant::Full).await;

    let (status, body) = send(&app, get("/api/v1/holdings/master")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No data available");
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn upload_without_file_part_is_rejected() {
    let (_tmp, app) = app(SchemaVariant::Full).await;
    let bytes = holdings_export(&[("AAPL", 100.0, 1.0)]);

    let (status, body) = send(&app, upload_request("document", "daily.xlsx", &bytes)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file part");
}

#[tokio::test]
async fn upload_without_file_name_is_rejected() {
    let (_tmp, app) = app(SchemaVariant::Full).await;
    let bytes = holdings_export(&[("AAPL", 100.0, 1.0)]);

    let (status, body) = send(&app, upload_request("file", "", &bytes)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No selected file");
}

#[tokio::test]
async fn empty_upload_is_rejected() {
    let (_tmp, app) = app(SchemaVariant::Full).await;

    let (status, _) = send(&app, upload_request("file", "daily.xlsx", &[])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unreadable_upload_is_a_processing_error() {
    let (tmp, app) = app(SchemaVariant::Full).await;

    let (status, body) = send(
        &app,
        upload_request("file", "daily.xlsx", b"definitely not a spreadsheet"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Error processing file"));
    assert!(!tmp.path().join("uploads/master_holdings.xlsx").exists());
}

#[tokio::test]
async fn upload_sorts_by_weight_and_builds_master() {
    let (tmp, app) = app(SchemaVariant::Full).await;
    let bytes = holdings_export(&[
        ("Alpha", 100.0, 2.0),
        ("Beta", 200.0, 0.5),
        ("Gamma", 50.0, 1.0),
    ]);

    let (status, body) = send(&app, upload_request("file", "daily.xlsx", &bytes)).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "File uploaded, sorted & merged by Weight!");
    assert_eq!(body["securities"], 3);
    assert!(body["sink_failures"].as_array().unwrap().is_empty());
    let column = body["dated_column"].as_str().unwrap().to_string();
    assert!(column.starts_with("Shares Held ("));
    assert!(tmp.path().join("uploads/daily.xlsx").exists());
    assert!(tmp.path().join("uploads/master_holdings.xlsx").exists());

    let (status, master) = send(&app, get("/api/v1/holdings/master")).await;
    assert_eq!(status, StatusCode::OK);
    let rows = master["data"].as_array().unwrap();
    let names: Vec<_> = rows.iter().map(|r| r["Share Name"].clone()).collect();
    assert_eq!(names, vec!["Beta", "Gamma", "Alpha"]);
    assert_eq!(rows[0][column.as_str()], 200);
    let keys: Vec<_> = rows[0].as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["Share Name".to_string(), column]);
}

#[tokio::test]
async fn upload_named_like_the_master_is_rejected() {
    let (tmp, app) = app(SchemaVariant::Full).await;
    let bytes = holdings_export(&[("Alpha", 100.0, 2.0)]);
    let (status, _) = send(&app, upload_request("file", "day1.xlsx", &bytes)).await;
    assert_eq!(status, StatusCode::OK);
    let master_path = tmp.path().join("uploads/master_holdings.xlsx");
    let saved = std::fs::read(&master_path).unwrap();

    let (status, body) = send(
        &app,
        upload_request("file", "master_holdings.xlsx", b"garbage not a workbook"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("reserved"));
    assert_eq!(std::fs::read(&master_path).unwrap(), saved);
    let (status, master) = send(&app, get("/api/v1/holdings/master")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(master["data"][0]["Share Name"], "Alpha");
}

#[tokio::test]
async fn second_upload_adds_a_column_and_total_change() {
    let (_tmp, app) = app(SchemaVariant::Basic).await;

    let first = holdings_export(&[("AAPL", 100.0, 1.0), ("MSFT", 200.0, 1.0)]);
    let (status, body) = send(&app, upload_request("file", "day1.xlsx", &first)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "File uploaded & merged successfully!");

    let second = holdings_export(&[("AAPL", 130.0, 1.0), ("GOOG", 50.0, 1.0)]);
    let (status, body) = send(&app, upload_request("file", "day2.xlsx", &second)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["securities"], 3);
    assert!(body["dated_column"].as_str().unwrap().ends_with("#2)"));

    let (_, master) = send(&app, get("/api/v1/holdings/master")).await;
    let rows = master["data"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    let keys: Vec<_> = rows[0].as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys.len(), 4);
    assert_eq!(keys.last().unwrap(), "Total Change in Shares");
    assert_eq!(rows[0]["Share Name"], "AAPL");
    assert_eq!(rows[0]["Total Change in Shares"], 30);
    assert_eq!(rows[1]["Total Change in Shares"], Value::Null);

    let (status, changes) = send(&app, get("/api/v1/holdings/changes?limit=5")).await;
    assert_eq!(status, StatusCode::OK);
    let data = changes["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["securityName"], "AAPL");
}

#[tokio::test]
async fn changes_are_not_found_before_first_upload() {
    let (_tmp, app) = app(SchemaVariant::Full).await;

    let (status, _) = send(&app, get("/api/v1/holdings/changes")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn configured_sinks_receive_the_snapshot() {
    let tmp = tempdir().unwrap();
    let mut config = test_config(tmp.path(), SchemaVariant::Full);
    config.sqlite_sink_path = Some(
        tmp.path()
            .join("sink/holdings.db")
            .to_string_lossy()
            .into_owned(),
    );
    config.document_sink_dir = Some(tmp.path().join("documents"));
    let app = app_with(&config).await;
    let bytes = holdings_export(&[("AAPL", 100.0, 1.0)]);

    let (status, body) = send(&app, upload_request("file", "daily.xlsx", &bytes)).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["sink_failures"].as_array().unwrap().is_empty());
    assert!(tmp.path().join("sink/holdings.db").exists());
    let documents: Vec<_> = std::fs::read_dir(tmp.path().join("documents"))
        .unwrap()
        .collect();
    assert_eq!(documents.len(), 1);
}
