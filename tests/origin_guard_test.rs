//! Integration tests for the origin allow-list guard and CORS headers

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{body_json, build_test_app, build_test_app_with, FRONTEND_ORIGIN};

fn get_products(origin: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri("/products");
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_allowed_origin_gets_cors_headers() {
    let app = build_test_app().await;
    let response = app.send(get_products(Some(FRONTEND_ORIGIN))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let allow_origin = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .expect("Missing Access-Control-Allow-Origin header")
        .to_str()
        .unwrap();
    assert_eq!(allow_origin, FRONTEND_ORIGIN);
}

#[tokio::test]
async fn test_disallowed_origin_is_rejected() {
    let app = build_test_app().await;
    let response = app
        .send(get_products(Some("http://evil.example.com")))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["status"], 403);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("http://evil.example.com"));
}

#[tokio::test]
async fn test_disallowed_origin_cannot_delete() {
    let app = build_test_app().await;
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/products/0")
        .header(header::ORIGIN, "http://evil.example.com")
        .body(Body::empty())
        .unwrap();

    // Guard runs before the handler, so no 404 for the unknown id
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_origin_allowed_by_default() {
    let app = build_test_app().await;
    let response = app.send(get_products(None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_origin_rejected_under_strict_policy() {
    let app = build_test_app_with(|config| config.cors.allow_missing_origin = false).await;
    let response = app.send(get_products(None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_static_files_not_guarded() {
    let app = build_test_app_with(|config| config.cors.allow_missing_origin = false).await;
    std::fs::write(app.upload_dir().join("public.png"), b"img").unwrap();

    let request = Request::builder()
        .uri("/uploads/public.png")
        .header(header::ORIGIN, "http://elsewhere.example")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_preflight_for_allowed_origin() {
    let app = build_test_app().await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/products/0")
        .header(header::ORIGIN, FRONTEND_ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let allow_methods = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .expect("Missing Access-Control-Allow-Methods header")
        .to_str()
        .unwrap();
    assert!(
        allow_methods.contains("PUT"),
        "Allow-Methods should contain PUT, got: {allow_methods}"
    );
}
