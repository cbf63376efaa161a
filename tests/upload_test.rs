use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use filedrop::config::AppConfig;
use filedrop::services::storage::LocalStorage;
use filedrop::{AppState, create_app};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "---------------------------123456789012345678901234567";
const TOKEN: &str = "test-token";

fn test_state(max_upload_bytes: usize) -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        storage_root: dir.path().to_path_buf(),
        api_token: TOKEN.to_string(),
        max_upload_bytes,
        ..AppConfig::default()
    };
    let state = AppState {
        storage: Arc::new(LocalStorage::new(dir.path())),
        config,
    };
    (state, dir)
}

fn multipart_body(filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header("Authorization", format!("Bearer {TOKEN}"))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_upload_flow() {
    let (state, dir) = test_state(1024 * 1024);
    let app = create_app(state);

    let response = app
        .clone()
        .oneshot(upload_request(multipart_body("test.txt", b"hello world")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["filename"], "test.txt");

    assert_eq!(
        std::fs::read(dir.path().join("test.txt")).unwrap(),
        b"hello world"
    );
}

#[tokio::test]
async fn test_upload_sanitizes_traversal_names() {
    let (state, dir) = test_state(1024 * 1024);
    let app = create_app(state);

    let response = app
        .oneshot(upload_request(multipart_body(
            "../../../etc/passwd",
            b"not a password file",
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    // The client-supplied path collapsed to its final component
    assert_eq!(json["filename"], "passwd");
    assert!(dir.path().join("passwd").is_file());
    assert!(!dir.path().join("etc").exists());
}

#[tokio::test]
async fn test_upload_without_file_part_is_bad_request() {
    let (state, _dir) = test_state(1024 * 1024);
    let app = create_app(state);

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"comment\"\r\n\r\n\
             just text\r\n\
             --{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );

    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("file"));
}

#[tokio::test]
async fn test_upload_over_cap_is_rejected() {
    let (state, dir) = test_state(1024);
    let app = create_app(state);

    let response = app
        .oneshot(upload_request(multipart_body("big.bin", &vec![0u8; 1025])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    // Nothing was persisted
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_upload_at_exact_cap_succeeds() {
    let (state, _dir) = test_state(1024);
    let app = create_app(state);

    let response = app
        .oneshot(upload_request(multipart_body(
            "exact.bin",
            &vec![7u8; 1024],
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_upload_same_name_overwrites() {
    let (state, dir) = test_state(1024 * 1024);
    let app = create_app(state);

    let response = app
        .clone()
        .oneshot(upload_request(multipart_body("a.txt", b"first")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(upload_request(multipart_body("a.txt", b"second")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"second");
}

#[tokio::test]
async fn test_list_is_sorted_regardless_of_upload_order() {
    let (state, _dir) = test_state(1024 * 1024);
    let app = create_app(state);

    for name in ["b.txt", "a.txt"] {
        let response = app
            .clone()
            .oneshot(upload_request(multipart_body(name, b"x")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/files")
                .header("Authorization", format!("Bearer {TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["files"], serde_json::json!(["a.txt", "b.txt"]));
}
