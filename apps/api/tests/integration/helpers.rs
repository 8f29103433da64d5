use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde::de::DeserializeOwned;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::TempDir;
use tower::ServiceExt;
use upload_api::{
    config::Config,
    infrastructure::storage::{FileStorage, LocalDiskStorage},
    presentation::http::{routes::create_router, state::AppState},
};
use uuid::Uuid;

pub struct TestApp {
    pub app: Router,
    pub config: Config,
    // Keeps the upload directories alive for the duration of the test.
    _root: TempDir,
}

impl TestApp {
    pub fn resume_dir(&self) -> &Path {
        &self.config.resume_upload_dir
    }

    pub fn profile_dir(&self) -> &Path {
        &self.config.profile_upload_dir
    }

    /// On-disk location of a URL returned by the service.
    pub fn path_for_url(&self, url: &str) -> PathBuf {
        let rest = url
            .strip_prefix(&format!("/{}/", self.config.public_url_prefix))
            .unwrap_or_else(|| panic!("unexpected url prefix: {url}"));
        let (folder, name) = rest.split_once('/').expect("url has folder and name");
        match folder {
            "resume" => self.resume_dir().join(name),
            "profile" => self.profile_dir().join(name),
            other => panic!("unexpected folder {other}"),
        }
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    spawn_app_with_storage(customize, |config| {
        Arc::new(LocalDiskStorage::new(config.upload_idle_timeout())) as Arc<dyn FileStorage>
    })
    .await
}

pub async fn spawn_app_with_storage(
    customize: impl FnOnce(&mut Config),
    storage: impl FnOnce(&Config) -> Arc<dyn FileStorage>,
) -> TestApp {
    let root = tempfile::tempdir().expect("failed to create temp dir");
    let mut config = Config::with_upload_root(root.path().to_path_buf());
    config.host = "127.0.0.1".to_string();
    config.port = 0;
    customize(&mut config);

    std::fs::create_dir_all(&config.resume_upload_dir).expect("failed to create resume dir");
    std::fs::create_dir_all(&config.profile_upload_dir).expect("failed to create profile dir");

    let storage = storage(&config);
    let state = AppState::new(config.clone(), storage);

    TestApp {
        app: create_router(state),
        config,
        _root: root,
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn read_json<T: DeserializeOwned>(res: axum::response::Response) -> T {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("failed to parse json")
}

pub async fn read_text(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("invalid utf8")
}

pub async fn expect_status(
    res: axum::response::Response,
    expected: StatusCode,
) -> axum::response::Response {
    let actual = res.status();

    if actual == expected {
        return res;
    }

    let body = read_text(res).await;
    panic!(
        "HTTP status mismatch. Expected {}, got {}. Response body: {}",
        expected, actual, body
    );
}

/// Deterministic bytes that start like a PDF.
pub fn pdf_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.7\n".to_vec();
    bytes.extend((0..len.saturating_sub(bytes.len())).map(|i| (i % 251) as u8));
    bytes.truncate(len);
    bytes
}

/// Deterministic bytes that start like a PNG.
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend((0..len.saturating_sub(bytes.len())).map(|i| (i % 241) as u8));
    bytes.truncate(len);
    bytes
}

/// A single part of a hand-built multipart body.
pub enum Part<'a> {
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: Option<&'a str>,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

pub fn file_part<'a>(file_name: &'a str, content_type: &'a str, data: &'a [u8]) -> Part<'a> {
    Part::File {
        name: "file",
        file_name,
        content_type: Some(content_type),
        data,
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let boundary = format!("----upload-boundary-{}", Uuid::now_v7());
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        match part {
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                if let Some(content_type) = content_type {
                    body.extend_from_slice(
                        format!("Content-Type: {}\r\n", content_type).as_bytes(),
                    );
                }
                body.extend_from_slice(b"\r\n");
                body.extend_from_slice(data);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    (boundary, body)
}

pub fn upload_request(uri: &str, boundary: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("failed to build upload request")
}

pub async fn post_parts(app: &Router, uri: &str, parts: &[Part<'_>]) -> axum::response::Response {
    let (boundary, body) = multipart_body(parts);
    send(app, upload_request(uri, &boundary, body)).await
}

/// Names of every entry in `dir`, hidden in-flight files included.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("failed to read dir")
        .map(|entry| {
            entry
                .expect("failed to read dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

pub fn assert_status(status: StatusCode, expected: StatusCode) {
    assert_eq!(status, expected, "expected {}, got {}", expected, status);
}
