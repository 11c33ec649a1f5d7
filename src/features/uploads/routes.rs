use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::uploads::handlers::upload_image;
use crate::features::uploads::services::UploadService;

/// Create routes for the uploads feature
pub fn routes(service: Arc<UploadService>, max_upload_size: usize) -> Router {
    Router::new()
        .route(
            "/api/upload-image",
            post(upload_image).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .with_state(service)
}
