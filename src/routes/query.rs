use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use base64::Engine;
use tracing::info;

use crate::models::{AppState, QueryRequest};
use crate::tabular::FileKind;
use crate::types::{AppError, AppResult, QueryOutput, RawFile};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/query", post(post_query))
        .with_state(state)
}

async fn post_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> (StatusCode, Json<QueryOutput>) {
    info!(
        prompt_len = request.prompt.len(),
        has_file = request.file.is_some(),
        has_image = request.image_data.is_some(),
        "Received query request"
    );

    // Image variant short-circuits the tabular path.
    if let Some(image_data) = &request.image_data {
        let media_type = request.image_media_type.as_deref().unwrap_or("image/jpeg");
        let output = state
            .pipeline
            .run_with_image(&request.prompt, image_data, media_type)
            .await;
        return (status_for(&output), Json(output));
    }

    let raw_file = match decode_inline_file(&request) {
        Ok(file) => file,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(QueryOutput::failure(e.to_string())),
            )
        }
    };

    // An unrecognized declared type is a client error; report it as 400
    // before running the pipeline.
    if let Some(file) = &raw_file {
        if let Err(e) = FileKind::from_tag(&file.type_tag) {
            return (
                StatusCode::BAD_REQUEST,
                Json(QueryOutput::failure(e.to_string())),
            );
        }
    }

    let output = state.pipeline.run(&request.prompt, raw_file).await;
    (status_for(&output), Json(output))
}

fn status_for(output: &QueryOutput) -> StatusCode {
    if output.is_error() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

fn decode_inline_file(request: &QueryRequest) -> AppResult<Option<RawFile>> {
    let Some(encoded) = request.file.as_deref() else {
        return Ok(None);
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| AppError::InvalidRequest(format!("file is not valid base64: {}", e)))?;
    Ok(Some(RawFile::new(
        bytes,
        request.filetype.clone().unwrap_or_default(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(file: Option<&str>, filetype: Option<&str>) -> QueryRequest {
        QueryRequest {
            prompt: "q".to_string(),
            file: file.map(str::to_string),
            filetype: filetype.map(str::to_string),
            image_data: None,
            image_media_type: None,
        }
    }

    #[test]
    fn test_inline_file_decodes_base64() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("a,b\n1,2");
        let file = decode_inline_file(&request(Some(&encoded), Some("csv")))
            .unwrap()
            .unwrap();
        assert_eq!(file.bytes, b"a,b\n1,2");
        assert_eq!(file.type_tag, "csv");
    }

    #[test]
    fn test_missing_file_is_none() {
        assert!(decode_inline_file(&request(None, None)).unwrap().is_none());
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let err = decode_inline_file(&request(Some("not base64!!"), Some("csv"))).unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }
}
