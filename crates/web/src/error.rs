use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use category_storage::{StorageError, dto::category::MessageResponse, models::CategoryNameError};
use std::fmt;

/// Ways a create-category request can end without saving a row
#[derive(Debug)]
pub enum CategoryError {
    Forbidden,
    /// A structural key of the request context is absent. Holds its dotted path.
    MissingKey(String),
    InvalidJson(String),
    MissingFields,
    InvalidCharacters,
    DuplicateName,
    Storage(StorageError),
}

impl fmt::Display for CategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forbidden => write!(f, "Caller lacks the required role"),
            Self::MissingKey(key) => write!(f, "Missing key: {}", key),
            Self::InvalidJson(e) => write!(f, "Invalid JSON body: {}", e),
            Self::MissingFields => write!(f, "Missing fields: name"),
            Self::InvalidCharacters => write!(f, "Invalid characters in name"),
            Self::DuplicateName => write!(f, "Duplicate category name"),
            Self::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl CategoryError {
    /// Machine-readable code sent as `message`
    pub fn code(&self) -> &'static str {
        match self {
            Self::Forbidden => "FORBIDDEN",
            Self::MissingKey(_) => "MISSING_KEY",
            Self::InvalidJson(_) => "INVALID_JSON_FORMAT",
            Self::MissingFields => "MISSING_FIELDS",
            Self::InvalidCharacters => "INVALID_CHARACTERS",
            Self::DuplicateName => "DUPLICATE_NAME",
            Self::Storage(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::MissingKey(_)
            | Self::InvalidJson(_)
            | Self::MissingFields
            | Self::InvalidCharacters
            | Self::DuplicateName => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Builds the response body. Internal error text is only included when
    /// `expose_detail` is set; the missing key path is always included.
    pub fn to_body(&self, expose_detail: bool) -> MessageResponse {
        let body = MessageResponse::new(self.code());

        match self {
            Self::MissingKey(key) => body.with_error(key.clone()),
            Self::Storage(e) if expose_detail => body.with_error(e.to_string()),
            _ => body,
        }
    }

    /// The failure itself is logged by the pipeline, with its stage.
    pub fn into_response_with_detail(self, expose_detail: bool) -> Response {
        (self.status_code(), Json(self.to_body(expose_detail))).into_response()
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        self.into_response_with_detail(false)
    }
}

impl From<StorageError> for CategoryError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::DuplicateName(_) => Self::DuplicateName,
            other => Self::Storage(other),
        }
    }
}

impl From<CategoryNameError> for CategoryError {
    fn from(error: CategoryNameError) -> Self {
        match error {
            CategoryNameError::Missing => Self::MissingFields,
            CategoryNameError::InvalidCharacters => Self::InvalidCharacters,
        }
    }
}
