#![cfg(feature = "web-interface")]

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use base64::engine::{general_purpose::STANDARD, Engine};
use common::{pipeline, MockGenerator, MockOcr, MEETING_TEXT};
use http_body_util::BodyExt;
use picsync::server::{router, AppState, HealthResponse, ProcessResponse};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "picsync-test-boundary";

fn app(ocr: Option<MockOcr>, generator: Option<MockGenerator>) -> Router {
    let state = AppState {
        pipeline: Arc::new(pipeline(ocr, generator)),
    };
    router(state, "static", 1024 * 1024)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn clipboard_request(payload: Value) -> Request<Body> {
    Request::post("/api/process-clipboard")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn multipart_request(field: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"shot.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/process-image")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_collaborators() {
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(Some(MockOcr::new("x")), None), request).await;

    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "healthy");
    assert!(health.vision_api);
    assert!(!health.ai_refiner);
}

#[tokio::test]
async fn test_index_page() {
    let request = Request::get("/").body(Body::empty()).unwrap();
    let (status, body) = send(app(None, None), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("PicSync"));
}

#[tokio::test]
async fn test_clipboard_with_data_url() {
    let image = format!("data:image/png;base64,{}", STANDARD.encode(b"png bytes"));
    let request = clipboard_request(json!({ "image": image }));
    let (status, body) = send(app(Some(MockOcr::new(MEETING_TEXT)), None), request).await;

    assert_eq!(status, StatusCode::OK);
    let response: ProcessResponse = serde_json::from_slice(&body).unwrap();
    assert!(response.success);
    assert_eq!(response.extracted_text, MEETING_TEXT);
    assert_eq!(response.event.title.as_deref(), Some("Team Meeting"));
    assert_eq!(response.event.time.as_deref(), Some("2:30 PM"));
    assert_eq!(response.event.start_time.as_deref(), Some("2:30 PM"));
    assert_eq!(response.event.duration, "1 hour");
    assert!(response
        .calendar_url
        .contains("dates=20251003T143000/20251003T153000"));
}

#[tokio::test]
async fn test_clipboard_without_image_is_bad_request() {
    let request = clipboard_request(json!({}));
    let (status, body) = send(app(Some(MockOcr::new(MEETING_TEXT)), None), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["success"], json!(false));
    assert!(error["detail"].as_str().unwrap().contains("No image data"));
}

#[tokio::test]
async fn test_clipboard_with_invalid_base64_is_bad_request() {
    let request = clipboard_request(json!({ "image": "data:image/png;base64,%%%" }));
    let (status, _) = send(app(Some(MockOcr::new(MEETING_TEXT)), None), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

async fn assert_json_bad_request(request: Request<Body>) {
    let (status, body) = send(app(Some(MockOcr::new(MEETING_TEXT)), None), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["success"], json!(false));
    assert_eq!(error["error"], json!("malformed_input"));
    assert!(!error["detail"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_clipboard_body_rejections_are_json() {
    // Image of the wrong type
    assert_json_bad_request(clipboard_request(json!({ "image": 123 }))).await;

    // Not JSON at all
    let request = Request::post("/api/process-clipboard")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    assert_json_bad_request(request).await;

    // No content type
    let request = Request::post("/api/process-clipboard")
        .body(Body::from(json!({ "image": "aGVsbG8=" }).to_string()))
        .unwrap();
    assert_json_bad_request(request).await;
}

#[tokio::test]
async fn test_non_multipart_upload_is_json_bad_request() {
    let request = Request::post("/api/process-image")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("png bytes"))
        .unwrap();
    assert_json_bad_request(request).await;
}

#[tokio::test]
async fn test_missing_ocr_is_service_unavailable() {
    let request = clipboard_request(json!({ "image": STANDARD.encode(b"png bytes") }));
    let (status, body) = send(app(None, None), request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert!(error["detail"].as_str().unwrap().contains("Vision API"));
}

#[tokio::test]
async fn test_blank_ocr_text_is_bad_request() {
    let request = multipart_request("file", b"png bytes");
    let (status, _) = send(app(Some(MockOcr::new("\n  \n")), None), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_multipart_upload() {
    let request = multipart_request("file", b"png bytes");
    let reply = r#"{"title": "Team Sync", "end_time": "4:00 PM", "confidence": "Medium"}"#;
    let (status, body) = send(
        app(
            Some(MockOcr::new(MEETING_TEXT)),
            Some(MockGenerator::reply(reply)),
        ),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: ProcessResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.event.title.as_deref(), Some("Team Sync"));
    assert_eq!(response.event.location.as_deref(), Some("Room: 204"));
    assert!(response
        .calendar_url
        .contains("dates=20251003T143000/20251003T160000"));
    assert!(response.calendar_url.contains("text=Team%20Sync"));
}

#[tokio::test]
async fn test_multipart_without_file_field() {
    let request = multipart_request("attachment", b"png bytes");
    let (status, body) = send(app(Some(MockOcr::new(MEETING_TEXT)), None), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert!(error["detail"].as_str().unwrap().contains("No file uploaded"));
}

#[tokio::test]
async fn test_refiner_failure_keeps_draft() {
    let request = multipart_request("file", b"png bytes");
    let (status, body) = send(
        app(Some(MockOcr::new(MEETING_TEXT)), Some(MockGenerator::Fail)),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: ProcessResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.event.title.as_deref(), Some("Team Meeting"));
    assert!(response.event.confidence.is_none());
}
