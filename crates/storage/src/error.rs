use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Category name already exists: {0}")]
    DuplicateName(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// SQLSTATE 23505, raised by the `UNIQUE (name)` constraint.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }
}
