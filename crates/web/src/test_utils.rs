use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Bytes;
use category_storage::{
    CategoryStore, Result, StorageError,
    models::{Category, CategoryName},
};
use serde_json::{Value, json};

use crate::gateway::GatewayEvent;

/// A gateway event carrying `roles` as the groups claim.
pub(crate) fn event(roles: Value, body: &str) -> GatewayEvent {
    GatewayEvent {
        body: Some(Bytes::copy_from_slice(body.as_bytes())),
        request_context: Some(json!({
            "authorizer": { "claims": { "cognito:groups": roles } }
        })),
    }
}

/// Category store backed by a vector. The insert enforces name uniqueness the
/// way the database constraint does.
#[derive(Default)]
pub(crate) struct InMemoryCategoryStore {
    rows: Mutex<Vec<Category>>,
    exists_calls: AtomicUsize,
    insert_attempts: AtomicUsize,
    blind_exists: bool,
    failing_exists: bool,
    failing_insert: bool,
}

impl InMemoryCategoryStore {
    pub(crate) fn with_names(names: &[&str]) -> Self {
        let store = Self::default();
        {
            let mut rows = store.rows.lock().unwrap();
            for (i, name) in names.iter().enumerate() {
                rows.push(Category {
                    id: i as i32 + 1,
                    name: name.to_string(),
                    status: true,
                });
            }
        }
        store
    }

    /// `exists` always answers false, as if another request inserted the
    /// name between the check and the insert.
    pub(crate) fn blind_exists(mut self) -> Self {
        self.blind_exists = true;
        self
    }

    pub(crate) fn failing_exists(mut self) -> Self {
        self.failing_exists = true;
        self
    }

    pub(crate) fn failing_insert(mut self) -> Self {
        self.failing_insert = true;
        self
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.rows.lock().unwrap().iter().map(|c| c.name.clone()).collect()
    }

    pub(crate) fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn insert_attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn exists(&self, name: &CategoryName) -> Result<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_exists {
            return Err(StorageError::Database(sqlx::Error::PoolTimedOut));
        }
        if self.blind_exists {
            return Ok(false);
        }

        Ok(self.rows.lock().unwrap().iter().any(|c| c.name == name.as_ref()))
    }

    async fn insert(&self, name: &CategoryName) -> Result<Category> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);

        if self.failing_insert {
            return Err(StorageError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|c| c.name == name.as_ref()) {
            return Err(StorageError::DuplicateName(name.to_string()));
        }

        let category = Category {
            id: rows.len() as i32 + 1,
            name: name.to_string(),
            status: true,
        };
        rows.push(category.clone());

        Ok(category)
    }
}
