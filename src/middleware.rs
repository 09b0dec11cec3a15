//! HTTP middleware
//!
//! Request tracing and the origin allow-list guard.

use crate::error::AppError;
use crate::state::SharedState;
use axum::{
    extract::{Request, State},
    http::header::ORIGIN,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Request ID middleware - adds unique ID to each request for tracing
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

/// Reject requests whose `Origin` is not on the configured allow-list
///
/// Runs before the product handlers; a header that is not valid UTF-8 is
/// treated as an unknown origin.
pub async fn enforce_origin(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let origin = request
        .headers()
        .get(ORIGIN)
        .map(|v| v.to_str().unwrap_or("<invalid>").to_string());
    debug!(origin = ?origin, "Checking request origin");

    if !state.cors.is_allowed(origin.as_deref()) {
        let origin = origin.unwrap_or_else(|| "<missing>".to_string());
        warn!(origin = %origin, uri = %request.uri(), "Rejected request from disallowed origin");
        return Err(AppError::OriginRejected(origin));
    }

    Ok(next.run(request).await)
}
