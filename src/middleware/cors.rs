//! Cross-origin headers for browser clients.
//!
//! Policy:
//! - Every response carries the same three headers, including errors and the
//!   empty `204` preflight answer.
//! - Any origin, no credentials.
//!
//! `tower_http::cors::CorsLayer` is not used here: it answers preflight requests
//! itself with `200` and only sets the allow-methods/allow-headers pair on
//! preflight responses. Preflight is instead short-circuited by the token
//! handler, and the headers are stamped onto every response.

use axum::Router;
use axum::http::{HeaderValue, header};
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// Apply the CORS response headers to all responses of the given Router.
pub fn apply(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
}
