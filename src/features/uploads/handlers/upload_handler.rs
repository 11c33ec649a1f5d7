use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::uploads::dtos::{UploadImageDto, UploadImageResponseDto};
use crate::features::uploads::services::{ImageUpload, UploadService};
use crate::shared::types::ErrorResponse;

/// Upload a product image
///
/// Accepts multipart/form-data with:
/// - `file`: The image to upload (required)
/// - `collection`, `categoryId`, `itemName`: used to build the object name
#[utoipa::path(
    post,
    path = "/api/upload-image",
    tag = "uploads",
    request_body(
        content = UploadImageDto,
        content_type = "multipart/form-data",
        description = "Image file plus the catalog entry it belongs to",
    ),
    responses(
        (status = 200, description = "Image stored", body = UploadImageResponseDto),
        (status = 400, description = "No file uploaded", body = ErrorResponse),
        (status = 413, description = "File too large")
    )
)]
pub async fn upload_image(
    State(service): State<Arc<UploadService>>,
    mut multipart: Multipart,
) -> Result<Json<UploadImageResponseDto>, AppError> {
    let mut file: Option<(Vec<u8>, String, String)> = None;
    let mut collection = String::new();
    let mut category_id = String::new();
    let mut item_name = String::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field.file_name().unwrap_or("").to_string();

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                file = Some((data.to_vec(), file_name, content_type));
            }
            "collection" | "categoryId" | "itemName" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read {} field: {}", field_name, e))
                })?;
                match field_name.as_str() {
                    "collection" => collection = text,
                    "categoryId" => category_id = text,
                    _ => item_name = text,
                }
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let (data, file_name, content_type) =
        file.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let response = service
        .upload_image(ImageUpload {
            data,
            file_name,
            content_type,
            collection,
            category_id,
            item_name,
        })
        .await?;

    Ok(Json(response))
}
