// Datachat - ask questions to your tabular data through Claude on AWS Bedrock

pub mod config;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod routes;
pub mod storage;
pub mod tabular;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use pipeline::QueryPipeline;
pub use types::{QueryOutput, RawFile};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
