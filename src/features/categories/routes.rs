use std::sync::Arc;

use axum::{
    routing::{post, put},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
///
/// `collection` is any top-level partition name; it is not checked against a list.
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/{collection}/categories",
            post(handlers::create_category).get(handlers::list_categories),
        )
        .route(
            "/{collection}/categories/{category_id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .with_state(service)
}
