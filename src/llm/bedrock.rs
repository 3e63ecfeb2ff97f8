//! Bedrock runtime client
//!
//! Thin HTTP wrapper around the InvokeModel endpoint. The model id and
//! region come from configuration; the request body is the fixed envelope
//! from [`crate::llm::envelope`]. Responses are returned as raw JSON so the
//! result mapper can deal with the shape.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::InferenceConfig;
use crate::llm::envelope::InvokeRequest;
use crate::llm::provider::InferenceClient;
use crate::types::{AppError, AppResult};

pub struct BedrockClient {
    client: Client,
    endpoint: String,
    model_id: String,
    api_key: String,
    timeout_secs: u64,
}

impl BedrockClient {
    pub fn new(config: &InferenceConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::InferenceEndpoint(format!("failed to build http client: {}", e))
            })?;

        let endpoint = config.endpoint.clone().unwrap_or_else(|| {
            format!("https://bedrock-runtime.{}.amazonaws.com", config.region)
        });

        Ok(Self {
            client,
            endpoint,
            model_id: config.model_id.clone(),
            api_key: config.api_key.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn invoke_url(&self) -> String {
        format!("{}/model/{}/invoke", self.endpoint, self.model_id)
    }
}

#[async_trait]
impl InferenceClient for BedrockClient {
    async fn invoke(&self, request: &InvokeRequest) -> AppResult<serde_json::Value> {
        let url = self.invoke_url();
        debug!(model = %self.model_id, "Invoking Bedrock model");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(self.timeout_secs)
                } else {
                    AppError::InferenceEndpoint(format!("Bedrock request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::InferenceEndpoint(format!(
                "Bedrock returned {}: {}",
                status, body
            )));
        }

        let payload = response.text().await.map_err(|e| {
            AppError::InferenceEndpoint(format!("failed to read Bedrock response: {}", e))
        })?;
        serde_json::from_str(&payload)
            .map_err(|e| AppError::Parse(format!("response is not valid JSON: {}", e)))
    }
}
