// CORS configuration

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, AllowOrigin, CorsLayer};

/// Restrict origins to the configured list; fall back to permissive CORS
/// when nothing parses.
pub fn apply_cors(router: Router, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    router.layer(layer)
}
