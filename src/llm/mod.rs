// Inference layer for the Bedrock runtime

pub mod bedrock;
pub mod envelope;
pub mod provider;
pub mod response;

pub use envelope::{ContentBlock, ImageSource, InvokeRequest, RequestMessage, DEFAULT_MAX_TOKENS};
pub use provider::InferenceClient;
pub use response::extract_generated_text;
