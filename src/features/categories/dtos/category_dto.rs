use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::firestore::StoredDocument;

/// Request body for creating a category
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(required(message = "Category name required"))]
    #[schema(example = "Living Room")]
    pub name: Option<String>,
}

/// Request body for renaming a category
///
/// An absent or empty `name` leaves the category untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCategoryDto {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryCreatedDto {
    pub category_id: String,
}

/// A stored category: every stored field plus its document id
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    #[serde(flatten)]
    #[schema(value_type = Object, example = json!({
        "name": "Living Room",
        "slug": "living-room",
        "createdAt": "2024-05-01T10:00:00.123456Z"
    }))]
    pub fields: Map<String, Value>,
    pub category_id: String,
}

impl From<StoredDocument> for CategoryResponseDto {
    fn from(doc: StoredDocument) -> Self {
        let mut fields = doc.fields;
        // The id always wins over a stored field of the same name
        fields.remove("category_id");
        Self {
            fields,
            category_id: doc.id,
        }
    }
}
