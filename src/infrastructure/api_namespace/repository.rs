//! In-memory API namespace repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::api_namespace::{ApiId, ApiNamespace, ApiNamespaceRepository};
use crate::domain::DomainError;

/// In-memory implementation of ApiNamespaceRepository
#[derive(Debug, Default)]
pub struct InMemoryApiNamespaceRepository {
    namespaces: Arc<RwLock<HashMap<String, ApiNamespace>>>,
}

impl InMemoryApiNamespaceRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a namespace record
    pub async fn insert(&self, namespace: ApiNamespace) {
        let mut namespaces = self.namespaces.write().await;
        namespaces.insert(namespace.id().as_str().to_string(), namespace);
    }
}

#[async_trait]
impl ApiNamespaceRepository for InMemoryApiNamespaceRepository {
    async fn find_by_id(&self, id: &ApiId) -> Result<Option<ApiNamespace>, DomainError> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces.get(id.as_str()).cloned())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
