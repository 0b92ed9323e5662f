use std::fmt;

use thiserror::Error;

use crate::dto::category::CreateCategoryRequest;

/// Characters a category name may not contain.
///
/// This is a blocklist. It does not restrict length, whitespace-only names or
/// SQL metacharacters (queries are parameterized).
pub const FORBIDDEN_CHARACTERS: [char; 7] = ['<', '>', '/', '`', '\\', '{', '}'];

pub fn contains_forbidden_character(name: &str) -> bool {
    name.contains(FORBIDDEN_CHARACTERS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CategoryNameError {
    #[error("category name is missing or empty")]
    Missing,

    #[error("category name contains forbidden characters")]
    InvalidCharacters,
}

/// A category name that passed validation.
///
/// The name is kept exactly as submitted: no trimming and no case folding, so
/// uniqueness follows the database collation byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Validates `name` with the same rules as a create request.
    pub fn new(name: impl Into<String>) -> Result<Self, CategoryNameError> {
        CreateCategoryRequest {
            name: Some(name.into()),
        }
        .into_category_name()
    }

    pub(crate) fn from_validated(name: String) -> Self {
        Self(name)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
