pub mod category;

use async_trait::async_trait;

use crate::Database;
use crate::error::Result;
use crate::models::{Category, CategoryName};

pub use category::CategoryRepository;

/// The two storage operations the create-category workflow needs.
///
/// `exists` is a fast path for a friendly error. Only `insert` is
/// authoritative: it must report [`crate::StorageError::DuplicateName`] when the
/// uniqueness constraint rejects the row.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn exists(&self, name: &CategoryName) -> Result<bool>;

    async fn insert(&self, name: &CategoryName) -> Result<Category>;
}

#[async_trait]
impl CategoryStore for Database {
    async fn exists(&self, name: &CategoryName) -> Result<bool> {
        CategoryRepository::new(self.pool()).exists(name).await
    }

    async fn insert(&self, name: &CategoryName) -> Result<Category> {
        CategoryRepository::new(self.pool()).insert(name).await
    }
}
