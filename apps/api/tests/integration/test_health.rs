use super::helpers::{dir_entries, expect_status, read_json, send, spawn_app};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;

fn health_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("failed to build health request")
}

#[tokio::test]
async fn health_is_ok_when_directories_exist() {
    let app = spawn_app().await;

    let res = expect_status(send(&app.app, health_request()).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "up");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn health_reports_missing_directory() {
    let app = spawn_app().await;
    std::fs::remove_dir_all(app.profile_dir()).expect("failed to remove profile dir");

    let res = send(&app.app, health_request()).await;
    let res = expect_status(res, StatusCode::SERVICE_UNAVAILABLE).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["storage"], "down");
}

#[tokio::test]
async fn health_check_leaves_upload_directories_empty() {
    let app = spawn_app().await;

    expect_status(send(&app.app, health_request()).await, StatusCode::OK).await;
    assert!(dir_entries(app.resume_dir()).is_empty());
    assert!(dir_entries(app.profile_dir()).is_empty());
}

#[tokio::test]
async fn health_reports_destination_that_is_not_a_directory() {
    let app = spawn_app().await;
    std::fs::remove_dir_all(app.resume_dir()).expect("failed to remove resume dir");
    std::fs::write(app.resume_dir(), b"in the way").expect("failed to write placeholder");

    let res = send(&app.app, health_request()).await;
    let res = expect_status(res, StatusCode::SERVICE_UNAVAILABLE).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["storage"], "down");
}
