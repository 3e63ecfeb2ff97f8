//! Bedrock invoke envelope
//!
//! The request schema is fixed by the Anthropic-on-Bedrock protocol: a
//! version string, a token limit, and a single user message whose content is
//! a list of typed blocks. Text queries carry one text block; the image
//! variant appends an image block with a base64 payload.

use serde::{Deserialize, Serialize};

pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
pub const DEFAULT_MAX_TOKENS: u32 = 900;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub messages: Vec<RequestMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMessage {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub media_type: String,
    pub data: String,
}

impl InvokeRequest {
    /// Build the standard single-message, single-text-block envelope.
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            anthropic_version: ANTHROPIC_VERSION.to_string(),
            max_tokens,
            messages: vec![RequestMessage {
                role: "user".to_string(),
                content: vec![ContentBlock::Text {
                    text: prompt.into(),
                }],
            }],
        }
    }

    /// Append a base64 image block to the user message.
    pub fn with_image(mut self, data: impl Into<String>, media_type: impl Into<String>) -> Self {
        if let Some(message) = self.messages.first_mut() {
            message.content.push(ContentBlock::Image {
                source: ImageSource {
                    source_type: "base64".to_string(),
                    media_type: media_type.into(),
                    data: data.into(),
                },
            });
        }
        self
    }

    /// The first text block of the user message, if any.
    pub fn text(&self) -> Option<&str> {
        self.messages.first()?.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Image { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_envelope_shape() {
        let request = InvokeRequest::new("List all rows", 900);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(json["max_tokens"], 900);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
        assert_eq!(json["messages"][0]["content"][0]["text"], "List all rows");
    }

    #[test]
    fn test_image_variant_appends_second_block() {
        let request = InvokeRequest::new("Describe this", 900).with_image("aGVsbG8=", "image/jpeg");
        let json = serde_json::to_value(&request).unwrap();

        let content = json["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[1]["type"], "image");
        assert_eq!(content[1]["source"]["type"], "base64");
        assert_eq!(content[1]["source"]["media_type"], "image/jpeg");
        assert_eq!(content[1]["source"]["data"], "aGVsbG8=");
    }

    #[test]
    fn test_text_accessor_skips_image_blocks() {
        let request = InvokeRequest::new("prompt", 100).with_image("data", "image/png");
        assert_eq!(request.text(), Some("prompt"));
    }
}
