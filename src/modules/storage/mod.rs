//! Object storage for product images
//!
//! Provides a Google Cloud Storage client for public image uploads and an
//! in-process backend for tests and local development.

mod gcs_client;
mod memory_storage;

use async_trait::async_trait;

pub use gcs_client::GcsClient;
pub use memory_storage::MemoryObjectStorage;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage request failed: {0}")]
    Request(String),

    #[error("Storage returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to obtain access token: {0}")]
    Auth(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Object to be written to storage
#[derive(Debug, Clone)]
pub struct UploadObject {
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: String,
    pub cache_control: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    fn bucket_name(&self) -> &str;

    /// Store an object readable by anyone and return its public URL
    async fn upload_public(&self, object: UploadObject) -> StorageResult<String>;
}
