use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::categories::dtos::{
    CategoryCreatedDto, CategoryResponseDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::types::{ErrorResponse, MessageResponse};
use crate::shared::validation::{ensure_path_segments, validation_message};

/// Create a category under a collection
#[utoipa::path(
    post,
    path = "/{collection}/categories",
    params(
        ("collection" = String, Path, description = "Top-level collection, e.g. furniture")
    ),
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = CategoryCreatedDto),
        (status = 400, description = "Category name required", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    Path(collection): Path<String>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<CategoryCreatedDto>)> {
    ensure_path_segments(&[collection.as_str()])?;
    dto.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;
    let name = dto.name.unwrap_or_default();

    let created = service.create(&collection, &name).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List every category of a collection
#[utoipa::path(
    get,
    path = "/{collection}/categories",
    params(
        ("collection" = String, Path, description = "Top-level collection, e.g. furniture")
    ),
    responses(
        (status = 200, description = "Categories in store order", body = Vec<CategoryResponseDto>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<CategoryResponseDto>>> {
    ensure_path_segments(&[collection.as_str()])?;
    let categories = service.list(&collection).await?;
    Ok(Json(categories))
}

/// Rename a category
///
/// Only a non-empty `name` is applied; the slug and `updatedAt` follow it.
#[utoipa::path(
    put,
    path = "/{collection}/categories/{category_id}",
    params(
        ("collection" = String, Path, description = "Top-level collection"),
        ("category_id" = String, Path, description = "Category document id")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = MessageResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    Path((collection, category_id)): Path<(String, String)>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<MessageResponse>> {
    ensure_path_segments(&[collection.as_str(), category_id.as_str()])?;
    service
        .update(&collection, &category_id, dto.name.as_deref())
        .await?;
    Ok(Json(MessageResponse::new("Category updated")))
}

/// Delete a category together with all of its products
#[utoipa::path(
    delete,
    path = "/{collection}/categories/{category_id}",
    params(
        ("collection" = String, Path, description = "Top-level collection"),
        ("category_id" = String, Path, description = "Category document id")
    ),
    responses(
        (status = 200, description = "Category and its products deleted", body = MessageResponse),
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    Path((collection, category_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>> {
    ensure_path_segments(&[collection.as_str(), category_id.as_str()])?;
    service.delete(&collection, &category_id).await?;
    Ok(Json(MessageResponse::new(
        "Category and its products deleted",
    )))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::features::categories::models::category_document;
    use crate::features::products::models::product_document;
    use crate::shared::test_helpers::test_app;

    #[tokio::test]
    async fn test_create_category_derives_slug() {
        let app = test_app();

        let response = app
            .server
            .post("/furniture/categories")
            .json(&json!({"name": "Living Room"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let category_id = response.json::<Value>()["category_id"]
            .as_str()
            .unwrap()
            .to_string();

        let stored = app
            .store
            .get(&category_document("furniture", &category_id))
            .await
            .unwrap();
        assert_eq!(stored["name"], "Living Room");
        assert_eq!(stored["slug"], "living-room");
        assert!(stored.contains_key("createdAt"));
        assert!(!stored.contains_key("updatedAt"));
    }

    #[tokio::test]
    async fn test_create_category_without_name_writes_nothing() {
        let app = test_app();

        let response = app
            .server
            .post("/furniture/categories")
            .json(&json!({"label": "Beds"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"error": "Category name required"}));
        assert_eq!(app.store.len().await, 0);
    }

    #[tokio::test]
    async fn test_create_category_rejects_malformed_json() {
        let app = test_app();

        let response = app
            .server
            .post("/furniture/categories")
            .content_type("application/json")
            .bytes("{not json".into())
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn test_list_categories_returns_ids() {
        let app = test_app();
        let mut ids = Vec::new();
        for name in ["Sofas", "Wardrobes"] {
            let response = app
                .server
                .post("/furniture/categories")
                .json(&json!({ "name": name }))
                .await;
            ids.push(response.json::<Value>()["category_id"].clone());
        }
        // A different collection is a different partition
        app.server
            .post("/interiors/categories")
            .json(&json!({"name": "Kitchens"}))
            .await
            .assert_status(StatusCode::CREATED);

        let response = app.server.get("/furniture/categories").await;
        response.assert_status_ok();
        let listed = response.json::<Vec<Value>>();
        assert_eq!(listed.len(), 2);
        for id in &ids {
            assert!(listed.iter().any(|c| &c["category_id"] == id));
        }
        let sofas = listed.iter().find(|c| c["name"] == "Sofas").unwrap();
        assert_eq!(sofas["slug"], "sofas");
    }

    #[tokio::test]
    async fn test_list_unknown_collection_is_empty() {
        let app = test_app();
        let response = app.server.get("/lighting/categories").await;
        response.assert_status_ok();
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn test_update_category_recomputes_slug() {
        let app = test_app();
        let created = app
            .server
            .post("/interiors/categories")
            .json(&json!({"name": "Kitchen"}))
            .await
            .json::<Value>();
        let category_id = created["category_id"].as_str().unwrap();

        let response = app
            .server
            .put(&format!("/interiors/categories/{}", category_id))
            .json(&json!({"name": "Modular Kitchen"}))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({"message": "Category updated"}));

        let stored = app
            .store
            .get(&category_document("interiors", category_id))
            .await
            .unwrap();
        assert_eq!(stored["name"], "Modular Kitchen");
        assert_eq!(stored["slug"], "modular-kitchen");
        assert!(stored.contains_key("updatedAt"));
    }

    #[tokio::test]
    async fn test_update_category_without_name_changes_nothing() {
        let app = test_app();
        let created = app
            .server
            .post("/interiors/categories")
            .json(&json!({"name": "Bathroom"}))
            .await
            .json::<Value>();
        let category_id = created["category_id"].as_str().unwrap();
        let document = category_document("interiors", category_id);
        let before = app.store.get(&document).await.unwrap();

        let response = app
            .server
            .put(&format!("/interiors/categories/{}", category_id))
            .json(&json!({}))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({"message": "Category updated"}));

        assert_eq!(app.store.get(&document).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_category_removes_its_products() {
        let app = test_app();
        let created = app
            .server
            .post("/furniture/categories")
            .json(&json!({"name": "Chairs"}))
            .await
            .json::<Value>();
        let category_id = created["category_id"].as_str().unwrap();
        let products_url = format!("/furniture/categories/{}/products", category_id);

        for name in ["Stool", "Armchair"] {
            app.server
                .post(&products_url)
                .json(&json!({ "name": name }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = app
            .server
            .delete(&format!("/furniture/categories/{}", category_id))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({"message": "Category and its products deleted"}));

        app.server
            .get("/furniture/categories")
            .await
            .assert_json(&json!([]));
        app.server.get(&products_url).await.assert_json(&json!([]));
        assert_eq!(app.store.len().await, 0);
    }

    #[tokio::test]
    async fn test_encoded_slash_in_category_id_is_rejected() {
        let app = test_app();
        let category_id = app
            .server
            .post("/furniture/categories")
            .json(&json!({"name": "Chairs"}))
            .await
            .json::<Value>()["category_id"]
            .as_str()
            .unwrap()
            .to_string();
        let product_id = app
            .server
            .post(&format!("/furniture/categories/{}/products", category_id))
            .json(&json!({"name": "Stool"}))
            .await
            .json::<Value>()["product_id"]
            .as_str()
            .unwrap()
            .to_string();
        let nested = format!(
            "/furniture/categories/{}%2Fproducts%2F{}",
            category_id, product_id
        );

        let response = app
            .server
            .put(&nested)
            .json(&json!({"name": "Renamed"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        app.server
            .delete(&nested)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let product = app
            .store
            .get(&product_document("furniture", &category_id, &product_id))
            .await
            .unwrap();
        assert_eq!(product["name"], "Stool");
        assert!(!product.contains_key("slug"));
    }
}
