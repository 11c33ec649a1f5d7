use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::uploads::dtos::{UploadImageResponseDto, IMAGE_CACHE_CONTROL};
use crate::modules::storage::{ObjectStorage, UploadObject};

/// An uploaded image and the catalog entry it belongs to
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
    pub collection: String,
    pub category_id: String,
    pub item_name: String,
}

/// Service for product image uploads
pub struct UploadService {
    storage: Arc<dyn ObjectStorage>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// Store an image publicly and return its URL
    pub async fn upload_image(&self, upload: ImageUpload) -> Result<UploadImageResponseDto> {
        let key = image_object_key(
            &upload.collection,
            &upload.category_id,
            &upload.item_name,
            &upload.file_name,
            Uuid::new_v4(),
        );
        debug!(
            "Uploading {} ({} bytes) to bucket {}",
            key,
            upload.data.len(),
            self.storage.bucket_name()
        );

        let url = self
            .storage
            .upload_public(UploadObject {
                key,
                data: upload.data,
                content_type: upload.content_type,
                cache_control: IMAGE_CACHE_CONTROL.to_string(),
            })
            .await?;

        Ok(UploadImageResponseDto { url })
    }
}

/// Object name: `{collection}/{category_id}/{item_name}-{uuid}.{extension}`
///
/// The extension is whatever follows the last `.` of the uploaded file name, or the
/// whole name when it has no `.`.
pub fn image_object_key(
    collection: &str,
    category_id: &str,
    item_name: &str,
    file_name: &str,
    id: Uuid,
) -> String {
    let extension = file_name.rsplit('.').next().unwrap_or(file_name);
    format!(
        "{}/{}/{}-{}.{}",
        collection, category_id, item_name, id, extension
    )
}
