use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};

use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::products::{routes as products_routes, ProductService};
use crate::features::uploads::{routes as uploads_routes, UploadService};
use crate::modules::firestore::DocumentStore;
use crate::modules::storage::ObjectStorage;

/// Services shared by the request handlers, built once at startup
pub struct AppServices {
    pub category_service: Arc<CategoryService>,
    pub product_service: Arc<ProductService>,
    pub upload_service: Option<Arc<UploadService>>,
}

impl AppServices {
    pub fn new(store: Arc<dyn DocumentStore>, storage: Option<Arc<dyn ObjectStorage>>) -> Self {
        Self {
            category_service: Arc::new(CategoryService::new(Arc::clone(&store))),
            product_service: Arc::new(ProductService::new(store)),
            upload_service: storage.map(|storage| Arc::new(UploadService::new(storage))),
        }
    }
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Catalog, upload and health routes, without the cross-cutting layers
pub fn api_router(services: &AppServices, max_upload_size: usize) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_check))
        .merge(categories_routes::routes(Arc::clone(
            &services.category_service,
        )))
        .merge(products_routes::routes(Arc::clone(
            &services.product_service,
        )));

    if let Some(upload_service) = &services.upload_service {
        router = router.merge(uploads_routes::routes(
            Arc::clone(upload_service),
            max_upload_size,
        ));
    }

    router
}
