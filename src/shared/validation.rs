use validator::ValidationErrors;

use crate::core::error::AppError;

/// First custom message among the field errors, falling back to the full error list
///
/// Required-field failures carry a message meant to be shown to API clients verbatim.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

/// Reject path parameters that cannot name a single document or collection
///
/// axum decodes `%2F`, so an id such as `cat%2Fproducts%2Fp1` would otherwise
/// address a document at a different depth of the hierarchy.
pub fn ensure_path_segments(segments: &[&str]) -> Result<(), AppError> {
    match segments.iter().find(|s| s.is_empty() || s.contains('/')) {
        Some(segment) => Err(AppError::BadRequest(format!(
            "Invalid path parameter '{}'",
            segment
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Named {
        #[validate(required(message = "Product name required"))]
        name: Option<String>,
        #[validate(length(min = 2))]
        code: String,
    }

    #[test]
    fn test_custom_message_is_used() {
        let named = Named {
            name: None,
            code: "ok".to_string(),
        };
        let errors = named.validate().unwrap_err();
        assert_eq!(validation_message(&errors), "Product name required");
    }

    #[test]
    fn test_falls_back_to_error_list() {
        let named = Named {
            name: Some("Lamp".to_string()),
            code: "x".to_string(),
        };
        let errors = named.validate().unwrap_err();
        assert!(validation_message(&errors).contains("code"));
    }

    #[test]
    fn test_path_segments_must_be_single_level() {
        assert!(ensure_path_segments(&["furniture", "Xq3kT0aZb9Lm2Rp7Vw1c"]).is_ok());
        assert!(matches!(
            ensure_path_segments(&["furniture", "cat/products/p1"]),
            Err(AppError::BadRequest(_))
        ));
        assert!(ensure_path_segments(&["", "cat"]).is_err());
    }
}
