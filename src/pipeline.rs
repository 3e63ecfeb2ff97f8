//! Query pipeline
//!
//! The single linear pass behind every query: decode the file (if any),
//! flatten it, compose the prompt, build the invoke envelope, call the
//! model, map the response. Terminal on first failure; every error is
//! converted to the uniform [`QueryOutput`] failure shape at this boundary
//! and nothing escapes as a raw fault. No state is kept between
//! invocations, so concurrent calls need no coordination.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::llm::{extract_generated_text, InferenceClient, InvokeRequest};
use crate::prompt;
use crate::storage::StorageClient;
use crate::tabular::{self, FileKind};
use crate::types::{AppResult, QueryOutput, RawFile};

/// Above this the endpoint is likely to reject the composed request.
/// Oversized tables still pass through unmodified.
const FLATTENED_WARN_BYTES: usize = 262_144;

pub struct QueryPipeline {
    inference: Arc<dyn InferenceClient>,
    storage: Option<Arc<dyn StorageClient>>,
    default_key: Option<String>,
    max_tokens: u32,
}

impl QueryPipeline {
    pub fn new(inference: Arc<dyn InferenceClient>, max_tokens: u32) -> Self {
        Self {
            inference,
            storage: None,
            default_key: None,
            max_tokens,
        }
    }

    /// Enable the storage fallback: when a query carries no file, `key` is
    /// fetched from `storage` and decoded according to its extension.
    pub fn with_default_document(
        mut self,
        storage: Arc<dyn StorageClient>,
        key: impl Into<String>,
    ) -> Self {
        self.storage = Some(storage);
        self.default_key = Some(key.into());
        self
    }

    /// Run one query: prompt plus optional tabular file.
    pub async fn run(&self, instruction: &str, file: Option<RawFile>) -> QueryOutput {
        match self.execute(instruction, file).await {
            Ok((text, payload)) => QueryOutput::success(text, payload),
            Err(e) => {
                error!(error = %e, "Query pipeline failed");
                QueryOutput::failure(e.to_string())
            }
        }
    }

    /// Sibling variant for image inputs: no tabular stages, no format
    /// directive, just the prompt plus a base64 image block.
    pub async fn run_with_image(
        &self,
        instruction: &str,
        image_data: &str,
        media_type: &str,
    ) -> QueryOutput {
        let request =
            InvokeRequest::new(instruction, self.max_tokens).with_image(image_data, media_type);
        match self.invoke_and_map(request).await {
            Ok((text, payload)) => QueryOutput::success(text, payload),
            Err(e) => {
                error!(error = %e, "Image query failed");
                QueryOutput::failure(e.to_string())
            }
        }
    }

    async fn execute(&self, instruction: &str, file: Option<RawFile>) -> AppResult<(String, Value)> {
        let file = match file {
            Some(file) => Some(file),
            None => self.default_document().await?,
        };

        let flattened = match &file {
            Some(raw) => {
                let kind = FileKind::from_tag(&raw.type_tag)?;
                let table = tabular::decode(&raw.bytes, kind)?;
                let text = tabular::flatten(&table);
                debug!(rows = table.rows.len(), bytes = text.len(), "Flattened tabular data");
                if text.len() > FLATTENED_WARN_BYTES {
                    warn!(
                        bytes = text.len(),
                        "Flattened data is large; the inference endpoint may reject the request"
                    );
                }
                Some(text)
            }
            None => None,
        };

        let composed = prompt::compose(instruction, flattened.as_deref());
        self.invoke_and_map(InvokeRequest::new(composed, self.max_tokens))
            .await
    }

    async fn invoke_and_map(&self, request: InvokeRequest) -> AppResult<(String, Value)> {
        let payload = self.inference.invoke(&request).await?;
        let text = extract_generated_text(&payload)?;
        info!(response_len = text.len(), "Generated reply");
        Ok((text, payload))
    }

    async fn default_document(&self) -> AppResult<Option<RawFile>> {
        let (Some(storage), Some(key)) = (&self.storage, &self.default_key) else {
            return Ok(None);
        };
        info!(key = %key, "No file supplied, fetching default document from storage");
        let bytes = storage.fetch(key).await?;
        let type_tag = key
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_string())
            .unwrap_or_default();
        Ok(Some(RawFile::new(bytes, type_tag)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ContentBlock;
    use crate::prompt::FORMAT_DIRECTIVE;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct MockInference {
        requests: Mutex<Vec<InvokeRequest>>,
        payload: Value,
    }

    impl MockInference {
        fn new(payload: Value) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                payload,
            })
        }

        fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn last_request(&self) -> InvokeRequest {
            self.requests.lock().unwrap().last().unwrap().clone()
        }
    }

    #[async_trait]
    impl InferenceClient for MockInference {
        async fn invoke(&self, request: &InvokeRequest) -> AppResult<Value> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.payload.clone())
        }
    }

    struct MockStorage {
        bytes: Vec<u8>,
    }

    #[async_trait]
    impl StorageClient for MockStorage {
        async fn fetch(&self, _key: &str) -> AppResult<Vec<u8>> {
            Ok(self.bytes.clone())
        }

        async fn list(&self) -> AppResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_end_to_end_composes_exact_request_text() {
        let mock = MockInference::new(json!({"content": [{"type": "text", "text": "Two rows."}]}));
        let pipeline = QueryPipeline::new(mock.clone(), 900);

        let file = RawFile::new(b"Name,Age\nAlice,30".to_vec(), "csv");
        let output = pipeline.run("List all rows", Some(file)).await;

        assert_eq!(output.generated_text.as_deref(), Some("Two rows."));
        assert!(output.response.is_some());
        assert!(!output.is_error());

        assert_eq!(mock.call_count(), 1);
        let expected = format!("List all rows\ndata:\nName, Age\nAlice, 30{}", FORMAT_DIRECTIVE);
        assert_eq!(mock.last_request().text(), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn test_unsupported_type_never_reaches_endpoint() {
        let mock = MockInference::new(json!({"content": []}));
        let pipeline = QueryPipeline::new(mock.clone(), 900);

        let file = RawFile::new(b"%PDF-1.4".to_vec(), "pdf");
        let output = pipeline.run("Summarize", Some(file)).await;

        assert!(output.is_error());
        assert!(output.error.unwrap().contains("Unsupported file type: pdf"));
        assert!(output.generated_text.is_none());
        assert!(output.response.is_none());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_xlsx_bytes_fail_before_invoke() {
        let mock = MockInference::new(json!({"content": []}));
        let pipeline = QueryPipeline::new(mock.clone(), 900);

        let output = pipeline.run("Summarize", Some(RawFile::new(Vec::new(), "xlsx"))).await;

        assert!(output.is_error());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_file_composes_prompt_and_directive_only() {
        let mock = MockInference::new(json!({"content": [{"type": "text", "text": "ok"}]}));
        let pipeline = QueryPipeline::new(mock.clone(), 900);

        let output = pipeline.run("What is AWS?", None).await;

        assert!(!output.is_error());
        let text = mock.last_request().text().unwrap().to_string();
        assert_eq!(text, format!("What is AWS?{}", FORMAT_DIRECTIVE));
        assert!(!text.contains("data:"));
    }

    #[tokio::test]
    async fn test_storage_fallback_supplies_default_document() {
        let mock = MockInference::new(json!({"content": [{"type": "text", "text": "ok"}]}));
        let storage = Arc::new(MockStorage {
            bytes: b"Name,Age\nBob,25".to_vec(),
        });
        let pipeline =
            QueryPipeline::new(mock.clone(), 900).with_default_document(storage, "employees.csv");

        let output = pipeline.run("Who is listed?", None).await;

        assert!(!output.is_error());
        let text = mock.last_request().text().unwrap().to_string();
        assert!(text.contains("data:\nName, Age\nBob, 25"));
    }

    #[tokio::test]
    async fn test_image_variant_appends_image_block_without_directive() {
        let mock = MockInference::new(json!({"content": [{"type": "text", "text": "a cat"}]}));
        let pipeline = QueryPipeline::new(mock.clone(), 900);

        let output = pipeline
            .run_with_image("Describe this image", "aGVsbG8=", "image/jpeg")
            .await;

        assert_eq!(output.generated_text.as_deref(), Some("a cat"));
        let request = mock.last_request();
        assert_eq!(request.text(), Some("Describe this image"));
        assert_eq!(request.messages[0].content.len(), 2);
        assert!(matches!(
            &request.messages[0].content[1],
            ContentBlock::Image { source } if source.media_type == "image/jpeg"
        ));
    }

    #[tokio::test]
    async fn test_max_tokens_flows_into_envelope() {
        let mock = MockInference::new(json!({"content": [{"type": "text", "text": "ok"}]}));
        let pipeline = QueryPipeline::new(mock.clone(), 200);

        pipeline.run("hello", None).await;

        assert_eq!(mock.last_request().max_tokens, 200);
    }

    #[tokio::test]
    async fn test_missing_text_field_maps_to_empty_string() {
        let mock = MockInference::new(json!({"completions": [{}]}));
        let pipeline = QueryPipeline::new(mock.clone(), 900);

        let output = pipeline.run("hello", None).await;

        assert!(!output.is_error());
        assert_eq!(output.generated_text.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_unknown_response_shape_is_a_uniform_failure() {
        let mock = MockInference::new(json!({"unexpected": true}));
        let pipeline = QueryPipeline::new(mock.clone(), 900);

        let output = pipeline.run("hello", None).await;

        assert!(output.is_error());
        assert!(output.generated_text.is_none());
        assert!(output.response.is_none());
    }
}
