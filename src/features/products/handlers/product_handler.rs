use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::products::dtos::{
    CreateProductDto, ProductCreatedDto, ProductResponseDto, UpdateProductDto,
};
use crate::features::products::services::{ProductInput, ProductService};
use crate::shared::types::{ErrorResponse, MessageResponse};
use crate::shared::validation::{ensure_path_segments, validation_message};

/// Create a product under a category
#[utoipa::path(
    post,
    path = "/{collection}/categories/{category_id}/products",
    params(
        ("collection" = String, Path, description = "Top-level collection"),
        ("category_id" = String, Path, description = "Parent category document id")
    ),
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created", body = ProductCreatedDto),
        (status = 400, description = "Product name required", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(service): State<Arc<ProductService>>,
    Path((collection, category_id)): Path<(String, String)>,
    AppJson(dto): AppJson<CreateProductDto>,
) -> Result<(StatusCode, Json<ProductCreatedDto>)> {
    ensure_path_segments(&[collection.as_str(), category_id.as_str()])?;
    dto.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let input = ProductInput {
        name: dto.name.as_deref().unwrap_or_default(),
        description: dto.description.as_deref().unwrap_or_default(),
        image_url: dto.image_url.as_deref().unwrap_or_default(),
    };
    let created = service.create(&collection, &category_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the products of a category
#[utoipa::path(
    get,
    path = "/{collection}/categories/{category_id}/products",
    params(
        ("collection" = String, Path, description = "Top-level collection"),
        ("category_id" = String, Path, description = "Parent category document id")
    ),
    responses(
        (status = 200, description = "Products in store order", body = Vec<ProductResponseDto>),
    ),
    tag = "products"
)]
pub async fn list_products(
    State(service): State<Arc<ProductService>>,
    Path((collection, category_id)): Path<(String, String)>,
) -> Result<Json<Vec<ProductResponseDto>>> {
    ensure_path_segments(&[collection.as_str(), category_id.as_str()])?;
    let products = service.list(&collection, &category_id).await?;
    Ok(Json(products))
}

/// Replace a product's fields
///
/// Omitted fields are stored as empty strings and `createdAt` is reset to the
/// time of the update.
#[utoipa::path(
    put,
    path = "/{collection}/categories/{category_id}/products/{product_id}",
    params(
        ("collection" = String, Path, description = "Top-level collection"),
        ("category_id" = String, Path, description = "Parent category document id"),
        ("product_id" = String, Path, description = "Product document id")
    ),
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Product updated", body = MessageResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(service): State<Arc<ProductService>>,
    Path((collection, category_id, product_id)): Path<(String, String, String)>,
    AppJson(dto): AppJson<UpdateProductDto>,
) -> Result<Json<MessageResponse>> {
    ensure_path_segments(&[
        collection.as_str(),
        category_id.as_str(),
        product_id.as_str(),
    ])?;
    let input = ProductInput {
        name: dto.name.as_deref().unwrap_or_default(),
        description: dto.description.as_deref().unwrap_or_default(),
        image_url: dto.image_url.as_deref().unwrap_or_default(),
    };
    service
        .update(&collection, &category_id, &product_id, input)
        .await?;
    Ok(Json(MessageResponse::new("Product updated")))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{collection}/categories/{category_id}/products/{product_id}",
    params(
        ("collection" = String, Path, description = "Top-level collection"),
        ("category_id" = String, Path, description = "Parent category document id"),
        ("product_id" = String, Path, description = "Product document id")
    ),
    responses(
        (status = 200, description = "Product deleted, whether or not it existed", body = MessageResponse),
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(service): State<Arc<ProductService>>,
    Path((collection, category_id, product_id)): Path<(String, String, String)>,
) -> Result<Json<MessageResponse>> {
    ensure_path_segments(&[
        collection.as_str(),
        category_id.as_str(),
        product_id.as_str(),
    ])?;
    service
        .delete(&collection, &category_id, &product_id)
        .await?;
    Ok(Json(MessageResponse::new("Product deleted")))
}
