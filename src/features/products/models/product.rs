use crate::features::categories::models::category_document;
use crate::modules::firestore::{CollectionPath, DocumentFields, DocumentPath};

/// Sub-collection of a category document holding its products
pub const PRODUCTS_COLLECTION: &str = "products";

pub const FIELD_NAME: &str = "name";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_IMAGE_URL: &str = "imageUrl";
pub const FIELD_CREATED_AT: &str = "createdAt";

pub fn product_collection(collection: &str, category_id: &str) -> CollectionPath {
    category_document(collection, category_id).collection(PRODUCTS_COLLECTION)
}

pub fn product_document(collection: &str, category_id: &str, product_id: &str) -> DocumentPath {
    product_collection(collection, category_id).doc(product_id)
}

/// Every product field, written in full on both create and update
///
/// Updates reuse this set, so they overwrite `createdAt` with the update time.
pub fn new_product_fields(name: &str, description: &str, image_url: &str) -> DocumentFields {
    DocumentFields::new()
        .string(FIELD_NAME, name)
        .string(FIELD_DESCRIPTION, description)
        .string(FIELD_IMAGE_URL, image_url)
        .server_timestamp(FIELD_CREATED_AT)
}
