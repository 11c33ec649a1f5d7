use std::sync::Arc;

use axum::{
    routing::{post, put},
    Router,
};

use crate::features::products::handlers;
use crate::features::products::services::ProductService;

/// Create routes for the products feature
pub fn routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route(
            "/{collection}/categories/{category_id}/products",
            post(handlers::create_product).get(handlers::list_products),
        )
        .route(
            "/{collection}/categories/{category_id}/products/{product_id}",
            put(handlers::update_product).delete(handlers::delete_product),
        )
        .with_state(service)
}
