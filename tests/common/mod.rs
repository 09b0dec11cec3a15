//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request, Response};
use axum::Router;
use catalog_service::config::Config;
use catalog_service::router::build_router;
use catalog_service::state::AppState;
use http_body_util::BodyExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

/// Origin allowed by the test configuration
pub const FRONTEND_ORIGIN: &str = "http://localhost:5173";

const BOUNDARY: &str = "----catalog-test-boundary";

/// Minimal bytes standing in for image payloads.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-png-body";
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0fake-jpeg-body";

/// A router wired to temporary image and staging directories.
pub struct TestApp {
    pub router: Router,
    pub config: Config,
    _dir: TempDir,
}

impl TestApp {
    pub fn upload_dir(&self) -> &Path {
        &self.config.storage.upload_dir
    }

    pub fn staging_dir(&self) -> &Path {
        &self.config.storage.staging_dir
    }

    pub fn stored_image(&self, filename: &str) -> PathBuf {
        self.upload_dir().join(filename)
    }

    /// Number of files currently in the staging directory.
    pub fn staged_count(&self) -> usize {
        std::fs::read_dir(self.staging_dir())
            .expect("Failed to read staging dir")
            .count()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router should not fail")
    }
}

/// Build a test configuration rooted in `dir`.
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.storage.upload_dir = dir.join("uploads");
    config.storage.staging_dir = dir.join("staging");
    config.cors.allowed_origins = vec![FRONTEND_ORIGIN.to_string()];
    config
}

pub async fn build_test_app() -> TestApp {
    build_test_app_with(|_| {}).await
}

/// Build the full router after letting the caller adjust the configuration.
pub async fn build_test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = test_config(dir.path());
    customize(&mut config);

    let state = AppState::new(&config);
    state
        .prepare_storage()
        .await
        .expect("Failed to create storage dirs");
    let router = build_router(state.shared(), &config).expect("Failed to build router");

    TestApp {
        router,
        config,
        _dir: dir,
    }
}

/// Hand-assembled `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn png(self) -> Self {
        self.file("file", "photo.png", "image/png", PNG_BYTES)
    }

    pub fn jpeg(self) -> Self {
        self.file("file", "photo.jpg", "image/jpeg", JPEG_BYTES)
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// Build a multipart request carrying the frontend origin.
pub fn multipart_request(method: Method, uri: &str, form: MultipartForm) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, FRONTEND_ORIGIN)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(form.finish()))
        .unwrap()
}

/// Build a body-less request carrying the frontend origin.
pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, FRONTEND_ORIGIN)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Body is not JSON")
}

/// Fetch the product list as JSON.
pub async fn list_products(app: &TestApp) -> Vec<serde_json::Value> {
    let response = app.send(request(Method::GET, "/products")).await;
    assert_eq!(response.status(), 200);
    match body_json(response).await {
        serde_json::Value::Array(items) => items,
        other => panic!("Expected a JSON array, got: {other}"),
    }
}

/// Create a product and assert success.
pub async fn create_product(app: &TestApp, form: MultipartForm) {
    let response = app
        .send(multipart_request(Method::POST, "/products", form))
        .await;
    assert_eq!(response.status(), 200, "create should succeed");
}
