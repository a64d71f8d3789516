//! Supabase Storage 适配器

use std::time::Duration;

use async_trait::async_trait;
use docreview_config::StorageConfig;
use docreview_errors::{AppError, AppResult};
use docreview_ports::{ObjectStorage, StoredObject, generate_storage_key};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, Secret};
use tracing::{debug, warn};

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    bucket: String,
    service_key: Secret<String>,
}

impl SupabaseStorage {
    pub fn new(config: &StorageConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            service_key: config.service_key.clone(),
        })
    }

    fn upload_url(&self, storage_key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, storage_key
        )
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, storage_key
        )
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        file_name: &str,
    ) -> AppResult<StoredObject> {
        let storage_key = generate_storage_key(file_name);
        debug!(storage_key = %storage_key, size = bytes.len(), "Uploading object");

        let response = self
            .client
            .post(self.upload_url(&storage_key))
            .bearer_auth(self.service_key.expose_secret())
            .header("apikey", self.service_key.expose_secret())
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Storage upload failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, storage_key = %storage_key, "Storage rejected upload");
            return Err(AppError::external_service(format!(
                "Storage upload failed with status {}: {}",
                status, body
            )));
        }

        Ok(StoredObject {
            public_url: self.public_url(&storage_key),
            storage_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let storage = SupabaseStorage::new(&StorageConfig {
            base_url: "https://project.supabase.co/".to_string(),
            bucket: "documents".to_string(),
            service_key: Secret::new("service-role-key".to_string()),
        })
        .unwrap();

        assert_eq!(
            storage.upload_url("a.pdf"),
            "https://project.supabase.co/storage/v1/object/documents/a.pdf"
        );
        assert_eq!(
            storage.public_url("a.pdf"),
            "https://project.supabase.co/storage/v1/object/public/documents/a.pdf"
        );
    }
}
