//! Result mapping
//!
//! The upstream response schema has drifted over time, so a small closed set
//! of shapes is accepted:
//!
//! 1. Anthropic messages: `content[0].text`
//! 2. `completions[0].text`
//! 3. `completions[0].data.text`
//!
//! A matching container with a missing text field yields an empty string
//! rather than an error; only a payload matching none of the containers is a
//! parse failure.

use serde_json::Value;

use crate::types::{AppError, AppResult};

/// Extract the generated text from a decoded response payload.
pub fn extract_generated_text(payload: &Value) -> AppResult<String> {
    if let Some(content) = payload.get("content").and_then(Value::as_array) {
        let text = content
            .first()
            .and_then(|block| block.get("text"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Ok(text.to_string());
    }

    if let Some(completions) = payload.get("completions").and_then(Value::as_array) {
        let first = completions.first();
        let text = first
            .and_then(|c| c.get("text"))
            .and_then(Value::as_str)
            .or_else(|| {
                first
                    .and_then(|c| c.get("data"))
                    .and_then(|d| d.get("text"))
                    .and_then(Value::as_str)
            })
            .unwrap_or_default();
        return Ok(text.to_string());
    }

    Err(AppError::Parse(
        "response matches no known completion shape".to_string(),
    ))
}
