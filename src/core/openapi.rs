use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::products::{dtos as products_dtos, handlers as products_handlers};
use crate::features::uploads::{dtos as uploads_dtos, handlers as uploads_handlers};
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        categories_handlers::create_category,
        categories_handlers::list_categories,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Products
        products_handlers::create_product,
        products_handlers::list_products,
        products_handlers::update_product,
        products_handlers::delete_product,
        // Uploads
        uploads_handlers::upload_image,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            MessageResponse,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryCreatedDto,
            categories_dtos::CategoryResponseDto,
            // Products
            products_dtos::CreateProductDto,
            products_dtos::UpdateProductDto,
            products_dtos::ProductCreatedDto,
            products_dtos::ProductResponseDto,
            // Uploads
            uploads_dtos::UploadImageDto,
            uploads_dtos::UploadImageResponseDto,
        )
    ),
    tags(
        (name = "categories", description = "Categories within a top-level collection"),
        (name = "products", description = "Products within a category"),
        (name = "uploads", description = "Product image uploads"),
    ),
    info(
        title = "Arambha Catalog API",
        version = "0.1.0",
        description = "API documentation for the Arambha catalog",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_catalog_routes() {
        let mut openapi = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Catalog".to_string(),
            version: "9.9.9".to_string(),
            description: "Test build".to_string(),
        }
        .modify(&mut openapi);

        assert_eq!(openapi.info.title, "Catalog");
        assert_eq!(openapi.info.version, "9.9.9");

        let paths = &openapi.paths.paths;
        assert!(paths.contains_key("/{collection}/categories"));
        assert!(paths.contains_key("/{collection}/categories/{category_id}"));
        assert!(paths.contains_key("/{collection}/categories/{category_id}/products"));
        assert!(paths.contains_key("/{collection}/categories/{category_id}/products/{product_id}"));
        assert!(paths.contains_key("/api/upload-image"));
    }
}
