// Core types and error taxonomy

/// A file as received at the boundary: raw bytes plus the declared type tag.
///
/// The tag is matched case-insensitively against the supported set (`xlsx`,
/// `xls`, the spreadsheet MIME alias, `csv`); anything else is rejected when
/// the decoder runs.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub bytes: Vec<u8>,
    pub type_tag: String,
}

impl RawFile {
    pub fn new(bytes: Vec<u8>, type_tag: impl Into<String>) -> Self {
        Self {
            bytes,
            type_tag: type_tag.into(),
        }
    }
}

/// Caller-facing outcome of one pipeline invocation.
///
/// Success carries the generated text plus the raw upstream payload; failure
/// carries only an error message. The two never mix: a failing stage
/// produces no partial result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QueryOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryOutput {
    pub fn success(generated_text: impl Into<String>, response: serde_json::Value) -> Self {
        Self {
            generated_text: Some(generated_text.into()),
            response: Some(response),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            generated_text: None,
            response: None,
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File is not valid UTF-8 text: {0}")]
    Encoding(String),

    #[error("Failed to decode file: {0}")]
    Decode(String),

    #[error("Storage fetch failed: {0}")]
    StorageFetch(String),

    #[error("Inference endpoint error: {0}")]
    InferenceEndpoint(String),

    #[error("Inference request timed out after {0}s")]
    Timeout(u64),

    #[error("Failed to parse model response: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
