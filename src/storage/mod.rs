// Storage layer (S3-compatible)

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::debug;

use crate::config::StorageConfig;
use crate::types::{AppError, AppResult};

/// Object-store collaborator.
///
/// Only two operations matter here: fetching the fallback default document
/// and listing keys for the file picker. Injected so the pipeline can run
/// against a fake in tests.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn fetch(&self, key: &str) -> AppResult<Vec<u8>>;
    async fn list(&self) -> AppResult<Vec<String>>;
}

pub struct S3Storage {
    bucket: Box<Bucket>,
}

impl S3Storage {
    pub fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse()
                .map_err(|e| AppError::StorageFetch(format!("invalid region: {}", e)))?,
        };

        let credentials = match (&config.access_key_id, &config.secret_access_key) {
            (Some(access_key), Some(secret_key)) => {
                Credentials::new(Some(access_key.as_str()), Some(secret_key.as_str()), None, None, None)
            }
            _ => Credentials::default(),
        }
        .map_err(|e| AppError::StorageFetch(format!("failed to build credentials: {}", e)))?;

        let bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| AppError::StorageFetch(format!("failed to open bucket: {}", e)))?;

        Ok(Self { bucket: Box::new(bucket) })
    }
}

#[async_trait]
impl StorageClient for S3Storage {
    async fn fetch(&self, key: &str) -> AppResult<Vec<u8>> {
        debug!(key, "Fetching object from storage");
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| AppError::StorageFetch(format!("failed to fetch {}: {}", key, e)))?;

        if response.status_code() != 200 {
            return Err(AppError::StorageFetch(format!(
                "fetching {} returned status {}",
                key,
                response.status_code()
            )));
        }
        Ok(response.bytes().to_vec())
    }

    async fn list(&self) -> AppResult<Vec<String>> {
        let pages = self
            .bucket
            .list(String::new(), None)
            .await
            .map_err(|e| AppError::StorageFetch(format!("failed to list bucket: {}", e)))?;

        Ok(pages
            .into_iter()
            .flat_map(|page| page.contents)
            .map(|object| object.key)
            .collect())
    }
}
