//! The dashboard's [`Router`] with its middleware.
//!
//! `main.rs` and the integration tests both go through [`build_app_router`],
//! so tests exercise the same timeout, request-id and CORS behaviour as the
//! running server.

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::handlers;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID: &str = "x-request-id";

/// Pages at the root, the JSON API under `/api`, and a 404 fallback.
///
/// Outermost layer first, a request passes through CORS, gets an
/// `x-request-id`, is traced, and then runs under the request timeout.
/// When the timeout fires the handler future is dropped, which kills any
/// script it started, and the client gets a 408. Panics become a 500.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::dashboard::router())
        .nest("/api", routes::api_routes())
        .fallback(handlers::dashboard::not_found)
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

/// CORS for the dashboard's own calls: GET for reads, POST for runs.
///
/// An origin that is not a valid header value aborts startup.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .unwrap_or_else(|e| panic!("CORS_ORIGINS entry {origin:?} is not a header value: {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "CORS_ORIGINS entry")]
    fn invalid_origin_aborts() {
        cors_layer(&["http://bad\norigin".to_string()]);
    }

    #[test]
    fn valid_origins_build() {
        cors_layer(&[
            "http://localhost:5000".to_string(),
            "https://dash.example".to_string(),
        ]);
    }
}
