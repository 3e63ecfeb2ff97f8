use anyhow::Result;
use serde::Deserialize;
use std::env;

use crate::llm::envelope::DEFAULT_MAX_TOKENS;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Key fetched as the fallback document when a query carries no file.
    pub default_key: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    pub model_id: String,
    pub region: String,
    pub api_key: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Overrides the regional Bedrock runtime URL; used in tests.
    pub endpoint: Option<String>,
}

impl StorageConfig {
    pub fn is_configured(&self) -> bool {
        !self.bucket.is_empty()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            storage: StorageConfig {
                bucket: env::var("S3_BUCKET").unwrap_or_default(),
                region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                default_key: env::var("S3_DEFAULT_KEY").ok(),
                access_key_id: env::var("AWS_ACCESS_KEY_ID").ok(),
                secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
                endpoint: env::var("S3_ENDPOINT").ok(),
            },
            inference: InferenceConfig {
                model_id: env::var("BEDROCK_MODEL_ID")
                    .unwrap_or_else(|_| "anthropic.claude-3-sonnet-20240229-v1:0".to_string()),
                region: env::var("BEDROCK_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                api_key: env::var("BEDROCK_API_KEY").unwrap_or_default(),
                max_tokens: env::var("BEDROCK_MAX_TOKENS")
                    .unwrap_or_else(|_| DEFAULT_MAX_TOKENS.to_string())
                    .parse()?,
                timeout_secs: env::var("BEDROCK_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()?,
                endpoint: env::var("BEDROCK_ENDPOINT").ok(),
            },
        })
    }
}
