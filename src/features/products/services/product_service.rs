use std::sync::Arc;

use crate::core::error::Result;
use crate::features::products::dtos::{ProductCreatedDto, ProductResponseDto};
use crate::features::products::models::{new_product_fields, product_collection, product_document};
use crate::modules::firestore::DocumentStore;

/// Product contents as written to the store
pub struct ProductInput<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub image_url: &'a str,
}

/// Service for product operations
pub struct ProductService {
    store: Arc<dyn DocumentStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        collection: &str,
        category_id: &str,
        input: ProductInput<'_>,
    ) -> Result<ProductCreatedDto> {
        let product_id = self
            .store
            .create_document(
                &product_collection(collection, category_id),
                new_product_fields(input.name, input.description, input.image_url),
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create product in category {} of '{}': {:?}",
                    category_id,
                    collection,
                    e
                );
                e
            })?;

        tracing::info!(
            "Created product {} ('{}') in category {} of '{}'",
            product_id,
            input.name,
            category_id,
            collection
        );
        Ok(ProductCreatedDto { product_id })
    }

    pub async fn list(&self, collection: &str, category_id: &str) -> Result<Vec<ProductResponseDto>> {
        let documents = self
            .store
            .list_documents(&product_collection(collection, category_id))
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to list products of category {} in '{}': {:?}",
                    category_id,
                    collection,
                    e
                );
                e
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    /// Overwrite every product field, including `createdAt`
    pub async fn update(
        &self,
        collection: &str,
        category_id: &str,
        product_id: &str,
        input: ProductInput<'_>,
    ) -> Result<()> {
        self.store
            .update_document(
                &product_document(collection, category_id, product_id),
                new_product_fields(input.name, input.description, input.image_url),
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to update product {} in category {} of '{}': {:?}",
                    product_id,
                    category_id,
                    collection,
                    e
                );
                e
            })?;

        tracing::info!(
            "Updated product {} in category {} of '{}'",
            product_id,
            category_id,
            collection
        );
        Ok(())
    }

    /// Delete a single product; a missing product is not an error
    pub async fn delete(&self, collection: &str, category_id: &str, product_id: &str) -> Result<()> {
        self.store
            .delete_document(&product_document(collection, category_id, product_id))
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to delete product {} in category {} of '{}': {:?}",
                    product_id,
                    category_id,
                    collection,
                    e
                );
                e
            })?;

        tracing::info!(
            "Deleted product {} in category {} of '{}'",
            product_id,
            category_id,
            collection
        );
        Ok(())
    }
}
