//! Router construction
//!
//! Shared by the binary and the integration tests so both exercise the
//! same middleware stack.

use crate::api;
use crate::config::Config;
use crate::middleware::{enforce_origin, request_id_middleware};
use crate::state::SharedState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Build the application router
///
/// Fails if a configured CORS origin is not a valid header value.
pub fn build_router(state: SharedState, config: &Config) -> anyhow::Result<Router> {
    let cors = build_cors_layer(config)?;

    let products = Router::new()
        .route(
            "/products",
            get(api::list_products).post(api::create_product),
        )
        .route(
            "/products/:id",
            put(api::update_product).delete(api::delete_product),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            enforce_origin,
        ))
        .layer(DefaultBodyLimit::max(config.body_limit()));

    let router = Router::new()
        .route("/health", get(api::health_check))
        .merge(products)
        .nest_service("/uploads", ServeDir::new(state.images.root()))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(cors)
        .with_state(state);

    Ok(router)
}

/// Build the CORS response-header layer from the origin allow-list
pub fn build_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origins = config.cors.origin_header_values()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]))
}
