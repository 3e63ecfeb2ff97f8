use async_trait::async_trait;

use crate::llm::envelope::InvokeRequest;
use crate::types::AppResult;

/// Synchronous call to a hosted model endpoint.
///
/// Injected into the pipeline so tests can substitute a fake; the production
/// implementation is [`crate::llm::bedrock::BedrockClient`]. One attempt per
/// call, no retry.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn invoke(&self, request: &InvokeRequest) -> AppResult<serde_json::Value>;
}
