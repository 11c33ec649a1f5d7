use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{ObjectStorage, StorageResult, UploadObject};

/// In-process object storage keyed by object name
pub struct MemoryObjectStorage {
    bucket: String,
    public_base_url: String,
    objects: Mutex<HashMap<String, UploadObject>>,
}

impl MemoryObjectStorage {
    pub fn new(bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub async fn get(&self, key: &str) -> Option<UploadObject> {
        self.objects.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    fn bucket_name(&self) -> &str {
        &self.bucket
    }

    async fn upload_public(&self, object: UploadObject) -> StorageResult<String> {
        let url = format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            self.bucket,
            object.key
        );
        self.objects.lock().await.insert(object.key.clone(), object);
        Ok(url)
    }
}
