//! HTTP-level middleware shared by every route.
//!
//! Responsibility:
//! - X-Request-Id の発行と response への伝播
//! - request tracing (span に request id を載せる)
//! - body size / global timeout の制限 (HttpConfig)
//!
//! Layer failures are answered with the same `RestError` body the auth
//! layer uses, so clients only ever parse one error shape.

use axum::Router;
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::{Request, StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::HttpConfig;
use crate::error::RestError;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub fn apply(router: Router, config: &HttpConfig) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        let request_id = req
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!("http", method = %req.method(), path = %req.uri().path(), request_id)
    });

    let layers = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(layer_error))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(trace)
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(TimeoutLayer::new(config.request_timeout));

    router.layer(layers)
}

async fn layer_error(err: BoxError) -> RestError {
    if err.is::<Elapsed>() {
        tracing::warn!("request exceeded the global timeout");
        return RestError::new(
            "request timed out",
            StatusCode::REQUEST_TIMEOUT,
            "request_timeout",
        );
    }

    RestError::internal_server_error("unhandled middleware error", err)
}
