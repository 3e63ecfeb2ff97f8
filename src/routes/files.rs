use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::error;

use crate::models::{AppState, FileListResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/files", get(list_files))
        .with_state(state)
}

/// Keys available in the configured bucket, for the file picker. An empty
/// list when no bucket is configured.
async fn list_files(
    State(state): State<AppState>,
) -> Result<Json<FileListResponse>, StatusCode> {
    let Some(storage) = &state.storage else {
        return Ok(Json(FileListResponse { files: Vec::new() }));
    };

    match storage.list().await {
        Ok(files) => Ok(Json(FileListResponse { files })),
        Err(e) => {
            error!(error = %e, "Failed to list storage bucket");
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}
