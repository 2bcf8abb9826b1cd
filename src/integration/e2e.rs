//! End-to-end tests over the full router

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

use crate::http::create_router;
use crate::integration::fixtures::{
    leftover_files, test_state, ScriptedTool, Step, HELLO_VTT, MANUAL_VTT,
};

fn app(tool: &Arc<ScriptedTool>, dir: &std::path::Path) -> Router {
    create_router(test_state(tool.clone(), dir))
}

fn transcript_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/transcript")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(ScriptedTool::new(Step::Nothing, Step::Nothing));
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(&tool, dir.path()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["message"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_transcript_success() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(ScriptedTool::new(Step::Write(HELLO_VTT.into()), Step::Fail));
    let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    let (status, body) = send(
        app(&tool, dir.path()),
        transcript_request(&format!(r#"{{"url":"{}"}}"#, url)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["url"], url);
    assert_eq!(body["transcript"], "Hello world how are you");
    assert_eq!(body["length"], 23);
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_manual_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(ScriptedTool::new(Step::Fail, Step::Write(MANUAL_VTT.into())));

    let (status, body) = send(
        app(&tool, dir.path()),
        transcript_request(r#"{"url":"https://youtu.be/dQw4w9WgXcQ"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transcript"], "Welcome to the show");
    assert_eq!(body["length"], 19);
}

#[tokio::test]
async fn test_malformed_url_skips_tool() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(ScriptedTool::new(Step::Write(HELLO_VTT.into()), Step::Fail));

    let (status, body) = send(
        app(&tool, dir.path()),
        transcript_request(r#"{"url":"not a url"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(tool.probes(), 0);
    assert_eq!(tool.fetches(), 0);
}

#[tokio::test]
async fn test_missing_url() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(ScriptedTool::new(Step::Nothing, Step::Nothing));

    for body in ["{}", r#"{"url":""}"#, r#"{"url":null}"#, "not json"] {
        let (status, json) = send(app(&tool, dir.path()), transcript_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(json["message"], "YouTube URL is required", "{}", body);
    }
    assert_eq!(tool.fetches(), 0);
}

#[tokio::test]
async fn test_no_captions() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(ScriptedTool::new(Step::Fail, Step::Fail));

    let (status, body) = send(
        app(&tool, dir.path()),
        transcript_request(r#"{"url":"https://www.youtube.com/watch?v=nocaptions"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Transcript Not Found");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_timeout_maps_to_408_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(ScriptedTool::new(
        Step::Hang(Duration::from_millis(30)),
        Step::Fail,
    ));

    let (status, body) = send(
        app(&tool, dir.path()),
        transcript_request(r#"{"url":"https://www.youtube.com/watch?v=slow"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body["error"], "Request Timeout");
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_tool_missing_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(ScriptedTool::missing());

    let (status, body) = send(
        app(&tool, dir.path()),
        transcript_request(r#"{"url":"https://youtu.be/dQw4w9WgXcQ"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    assert!(body["message"].is_string());
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_unknown_route() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(ScriptedTool::new(Step::Nothing, Step::Nothing));
    let request = Request::builder()
        .uri("/api/unknown")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(&tool, dir.path()), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_leave_no_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(ScriptedTool::new(Step::Fail, Step::Fail));
    for i in 0..12 {
        let doc = format!("WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nclip {}\n", i);
        let url = format!("https://youtu.be/clip{}", i);
        match i % 3 {
            0 => tool.script_url(&url, Step::Write(doc), Step::Fail),
            1 => tool.script_url(&url, Step::Fail, Step::Write(doc)),
            _ => tool.script_url(&url, Step::Fail, Step::Nothing),
        }
    }
    let router = app(&tool, dir.path());

    let handles: Vec<_> = (0..12)
        .map(|i| {
            let router = router.clone();
            tokio::spawn(async move {
                let body = format!(r#"{{"url":"https://youtu.be/clip{}"}}"#, i);
                send(router, transcript_request(&body)).await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (status, body) = handle.await.unwrap();
        if i % 3 == 2 {
            assert_eq!(status, StatusCode::NOT_FOUND);
        } else {
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["transcript"], format!("clip {}", i));
        }
    }
    assert!(leftover_files(dir.path()).is_empty());
}
