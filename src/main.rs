use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use datachat::llm::bedrock::BedrockClient;
use datachat::pipeline::QueryPipeline;
use datachat::storage::{S3Storage, StorageClient};
use datachat::{config::Config, routes::create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "datachat=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    let inference = Arc::new(BedrockClient::new(&config.inference)?);

    let storage: Option<Arc<dyn StorageClient>> = if config.storage.is_configured() {
        Some(Arc::new(S3Storage::from_config(&config.storage)?))
    } else {
        info!("No storage bucket configured, default-document fallback disabled");
        None
    };

    let mut pipeline = QueryPipeline::new(inference, config.inference.max_tokens);
    if let (Some(storage), Some(key)) = (&storage, &config.storage.default_key) {
        pipeline = pipeline.with_default_document(storage.clone(), key.clone());
    }

    // Create shared state
    let state = AppState {
        config: config.clone(),
        pipeline: Arc::new(pipeline),
        storage,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
