use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Cache policy applied to every uploaded image
pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000";

/// Upload image request DTO for OpenAPI documentation
/// Note: the handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadImageDto {
    /// The image to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Collection the image belongs to
    #[schema(example = "furniture")]
    pub collection: Option<String>,
    /// Category the image belongs to
    #[schema(rename = "categoryId", example = "Xq3kT0aZb9Lm2Rp7Vw1c")]
    pub category_id: Option<String>,
    /// Product name, used as the object name prefix
    #[schema(rename = "itemName", example = "teak-armchair")]
    pub item_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadImageResponseDto {
    /// Public URL of the stored image
    pub url: String,
}
