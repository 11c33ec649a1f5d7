use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::firestore::StoredDocument;

/// Request body for creating a product
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductDto {
    #[validate(required(message = "Product name required"))]
    #[schema(example = "Teak Armchair")]
    pub name: Option<String>,
    /// Defaults to an empty string
    pub description: Option<String>,
    /// Defaults to an empty string
    pub image_url: Option<String>,
}

/// Request body for updating a product
///
/// Every field is written: an omitted field is stored as an empty string.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductCreatedDto {
    pub product_id: String,
}

/// A stored product: every stored field plus its document id
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponseDto {
    #[serde(flatten)]
    #[schema(value_type = Object, example = json!({
        "name": "Teak Armchair",
        "description": "Solid teak with cane back",
        "imageUrl": "https://storage.googleapis.com/arambha/furniture/chairs/teak-armchair.jpg",
        "createdAt": "2024-05-01T10:00:00.123456Z"
    }))]
    pub fields: Map<String, Value>,
    pub product_id: String,
}

impl From<StoredDocument> for ProductResponseDto {
    fn from(doc: StoredDocument) -> Self {
        let mut fields = doc.fields;
        fields.remove("product_id");
        Self {
            fields,
            product_id: doc.id,
        }
    }
}
