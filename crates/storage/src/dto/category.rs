use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::models::{Category, CategoryName, CategoryNameError, contains_forbidden_character};

const MISSING_FIELDS_CODE: &str = "missing_fields";

/// Request payload for creating a new category
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, code = "missing_fields", message = "Name is required"))]
    #[validate(custom(function = "validate_name_characters"))]
    pub name: Option<String>,
}

fn validate_name_characters(name: &str) -> Result<(), validator::ValidationError> {
    if contains_forbidden_character(name) {
        Err(validator::ValidationError::new("invalid_characters"))
    } else {
        Ok(())
    }
}

impl CreateCategoryRequest {
    /// Turns the payload into a validated name.
    ///
    /// These rules are the only place names are checked. An absent, null or
    /// empty name reports [`CategoryNameError::Missing`]; an empty name has no
    /// forbidden characters, so the two rules never disagree.
    pub fn into_category_name(self) -> Result<CategoryName, CategoryNameError> {
        self.validate().map_err(|errors| classify(&errors))?;

        let name = self.name.ok_or(CategoryNameError::Missing)?;
        Ok(CategoryName::from_validated(name))
    }
}

fn classify(errors: &ValidationErrors) -> CategoryNameError {
    let missing = errors
        .field_errors()
        .get("name")
        .is_some_and(|errors| errors.iter().any(|e| e.code == MISSING_FIELDS_CODE));

    if missing {
        CategoryNameError::Missing
    } else {
        CategoryNameError::InvalidCharacters
    }
}

/// Category as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub status: bool,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            status: category.status,
        }
    }
}

/// Body of every response from the category endpoints.
///
/// `message` is a machine-readable code such as `CATEGORY_SAVED` or
/// `DUPLICATE_NAME`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryResponse>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
            category: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<CategoryResponse>) -> Self {
        self.category = Some(category.into());
        self
    }
}
