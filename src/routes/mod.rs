//! API Routes
//!
//! - `/api/query` - prompt plus optional tabular file, returns generated text
//! - `/api/files` - keys available in the configured bucket
//! - `/api/health` - liveness

pub mod files;
pub mod health;
pub mod query;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::cors::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let allowed_origins = state.config.server.cors_allowed_origins.clone();
    let api_router = Router::new()
        .merge(query::router(state.clone()))
        .merge(files::router(state.clone()))
        .merge(health::router(state));

    apply_cors(api_router, &allowed_origins).layer(TraceLayer::new_for_http())
}
