//! CORS policy for the browser audio client.
//!
//! The streaming proxy is the only component allowed to hand audio bytes
//! cross-origin, so the layer admits `Range` on requests and exposes
//! `Content-Range`/`Accept-Ranges` on responses for `<audio>` seeking.

use axum::http::{header, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

const PREFLIGHT_MAX_AGE_SECS: u64 = 86_400;

/// Exact match, or suffix match for entries starting with `.`.
pub fn origin_allowed(origin: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|entry| {
        if entry.starts_with('.') {
            origin.ends_with(entry.as_str())
        } else {
            origin == entry
        }
    })
}

pub fn make_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allowed = allowed_origins.to_vec();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|o| origin_allowed(o, &allowed))
                .unwrap_or(false)
        }))
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::RANGE])
        .expose_headers([header::CONTENT_RANGE, header::ACCEPT_RANGES])
        .max_age(Duration::from_secs(PREFLIGHT_MAX_AGE_SECS))
}
