use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::QueryPipeline;
use crate::storage::StorageClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<QueryPipeline>,
    pub storage: Option<Arc<dyn StorageClient>>,
}

/// Body of `POST /api/query`. Mirrors the invocation event shape: a prompt,
/// an optional base64 file with its declared type, or an optional base64
/// image for the image variant.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QueryRequest {
    pub prompt: String,
    pub file: Option<String>,
    pub filetype: Option<String>,
    pub image_data: Option<String>,
    pub image_media_type: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FileListResponse {
    pub files: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub model: String,
}
