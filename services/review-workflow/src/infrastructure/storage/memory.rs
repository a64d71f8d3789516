//! 内存对象存储（测试与本地演示）

use std::collections::HashMap;

use async_trait::async_trait;
use docreview_errors::AppResult;
use docreview_ports::{ObjectStorage, StoredObject, generate_storage_key};
use tokio::sync::RwLock;

/// 已保存的对象
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct InMemoryObjectStorage {
    base_url: String,
    objects: RwLock<HashMap<String, StoredBlob>>,
}

impl InMemoryObjectStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, storage_key: &str) -> Option<StoredBlob> {
        self.objects.read().await.get(storage_key).cloned()
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        file_name: &str,
    ) -> AppResult<StoredObject> {
        let storage_key = generate_storage_key(file_name);
        self.objects.write().await.insert(
            storage_key.clone(),
            StoredBlob {
                content_type: content_type.to_string(),
                bytes,
            },
        );

        Ok(StoredObject {
            public_url: format!("{}/{}", self.base_url, storage_key),
            storage_key,
        })
    }
}
