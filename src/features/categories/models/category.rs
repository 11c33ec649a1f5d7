use crate::modules::firestore::{CollectionPath, DocumentFields, DocumentPath};

pub const FIELD_NAME: &str = "name";
pub const FIELD_SLUG: &str = "slug";
pub const FIELD_CREATED_AT: &str = "createdAt";
pub const FIELD_UPDATED_AT: &str = "updatedAt";

/// URL-friendly form of a category name: lowercased, each space replaced by a hyphen
///
/// Only the ASCII space is replaced; other whitespace and punctuation pass through.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Categories are the direct children of a top-level collection
pub fn category_collection(collection: &str) -> CollectionPath {
    CollectionPath::root(collection)
}

pub fn category_document(collection: &str, category_id: &str) -> DocumentPath {
    category_collection(collection).doc(category_id)
}

/// Fields written when a category is created
pub fn new_category_fields(name: &str) -> DocumentFields {
    DocumentFields::new()
        .string(FIELD_NAME, name)
        .string(FIELD_SLUG, slugify(name))
        .server_timestamp(FIELD_CREATED_AT)
}

/// Fields written when a category is renamed
pub fn renamed_category_fields(name: &str) -> DocumentFields {
    DocumentFields::new()
        .string(FIELD_NAME, name)
        .string(FIELD_SLUG, slugify(name))
        .server_timestamp(FIELD_UPDATED_AT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::firestore::FieldValue;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Living Room"), "living-room");
        assert_eq!(slugify("Sofa  Sets"), "sofa--sets");
        assert_eq!(slugify("TV Units & Cabinets"), "tv-units-&-cabinets");
        assert_eq!(slugify("Ünïcode Décor"), "ünïcode-décor");
        assert_eq!(slugify("tab\tseparated"), "tab\tseparated");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_new_category_fields() {
        let fields: Vec<_> = new_category_fields("Dining Tables")
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();

        assert_eq!(
            fields,
            vec![
                (FIELD_CREATED_AT.to_string(), FieldValue::ServerTimestamp),
                (
                    FIELD_NAME.to_string(),
                    FieldValue::String("Dining Tables".to_string())
                ),
                (
                    FIELD_SLUG.to_string(),
                    FieldValue::String("dining-tables".to_string())
                ),
            ]
        );
    }

    #[test]
    fn test_renamed_category_touches_updated_at_only() {
        let fields = renamed_category_fields("Beds");
        let names: Vec<&str> = fields.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec![FIELD_NAME, FIELD_SLUG, FIELD_UPDATED_AT]);
    }
}
