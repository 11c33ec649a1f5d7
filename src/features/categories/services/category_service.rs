use std::sync::Arc;

use crate::core::error::Result;
use crate::features::categories::dtos::{CategoryCreatedDto, CategoryResponseDto};
use crate::features::categories::models::{
    category_collection, category_document, new_category_fields, renamed_category_fields,
};
use crate::features::products::models::product_collection;
use crate::modules::firestore::DocumentStore;

/// Service for category operations
pub struct CategoryService {
    store: Arc<dyn DocumentStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a category with a store-generated id
    pub async fn create(&self, collection: &str, name: &str) -> Result<CategoryCreatedDto> {
        let category_id = self
            .store
            .create_document(&category_collection(collection), new_category_fields(name))
            .await
            .map_err(|e| {
                tracing::error!("Failed to create category in '{}': {:?}", collection, e);
                e
            })?;

        tracing::info!(
            "Created category {} ('{}') in '{}'",
            category_id,
            name,
            collection
        );
        Ok(CategoryCreatedDto { category_id })
    }

    /// List every document directly under the collection
    pub async fn list(&self, collection: &str) -> Result<Vec<CategoryResponseDto>> {
        let documents = self
            .store
            .list_documents(&category_collection(collection))
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories in '{}': {:?}", collection, e);
                e
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    /// Rename a category, recomputing its slug
    ///
    /// Returns `false` without touching the store when there is no name to apply.
    pub async fn update(
        &self,
        collection: &str,
        category_id: &str,
        name: Option<&str>,
    ) -> Result<bool> {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            tracing::debug!(
                "No changes for category {} in '{}', skipping write",
                category_id,
                collection
            );
            return Ok(false);
        };

        self.store
            .update_document(
                &category_document(collection, category_id),
                renamed_category_fields(name),
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to update category {} in '{}': {:?}",
                    category_id,
                    collection,
                    e
                );
                e
            })?;

        tracing::info!("Renamed category {} in '{}' to '{}'", category_id, collection, name);
        Ok(true)
    }

    /// Delete every product of the category, then the category itself
    ///
    /// Products are removed one by one; a failure part way leaves the remaining
    /// products and the category in place. Returns the number of products deleted.
    pub async fn delete(&self, collection: &str, category_id: &str) -> Result<usize> {
        let products = product_collection(collection, category_id);
        let documents = self.store.list_documents(&products).await.map_err(|e| {
            tracing::error!(
                "Failed to list products of category {} in '{}': {:?}",
                category_id,
                collection,
                e
            );
            e
        })?;

        let mut deleted = 0;
        for document in documents {
            self.store
                .delete_document(&products.doc(document.id))
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Cascade delete of category {} in '{}' stopped after {} products: {:?}",
                        category_id,
                        collection,
                        deleted,
                        e
                    );
                    e
                })?;
            deleted += 1;
        }

        self.store
            .delete_document(&category_document(collection, category_id))
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to delete category {} in '{}': {:?}",
                    category_id,
                    collection,
                    e
                );
                e
            })?;

        tracing::info!(
            "Deleted category {} in '{}' with {} products",
            category_id,
            collection,
            deleted
        );
        Ok(deleted)
    }
}
