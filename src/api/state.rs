//! Application state for shared services

use std::sync::Arc;

use crate::domain::api_namespace::ApiNamespaceRepository;
use crate::domain::key::{CreateKeyRequest, Key, KeyId, KeyRepository};
use crate::domain::root_key::RootKeyRepository;
use crate::domain::DomainError;
use crate::infrastructure::key::{IssuedKey, KeyIssuanceService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub key_service: Arc<dyn KeyIssuanceTrait>,
}

/// Trait for key issuance operations
#[async_trait::async_trait]
pub trait KeyIssuanceTrait: Send + Sync {
    async fn create_key(
        &self,
        bearer: &str,
        request: CreateKeyRequest,
    ) -> Result<IssuedKey, DomainError>;
    async fn get_key(&self, id: &str) -> Result<Option<Key>, DomainError>;
    async fn ping_stores(&self) -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl<K, R, N> KeyIssuanceTrait for KeyIssuanceService<K, R, N>
where
    K: KeyRepository + 'static,
    R: RootKeyRepository + 'static,
    N: ApiNamespaceRepository + 'static,
{
    async fn create_key(
        &self,
        bearer: &str,
        request: CreateKeyRequest,
    ) -> Result<IssuedKey, DomainError> {
        KeyIssuanceService::create_key(self, bearer, request).await
    }

    async fn get_key(&self, id: &str) -> Result<Option<Key>, DomainError> {
        let key_id = KeyId::new(id).map_err(|e| DomainError::validation(e.to_string()))?;
        KeyIssuanceService::get_key(self, &key_id).await
    }

    async fn ping_stores(&self) -> Result<(), DomainError> {
        KeyIssuanceService::ping_stores(self).await
    }
}

impl AppState {
    /// Create new application state with the provided service
    pub fn new(key_service: Arc<dyn KeyIssuanceTrait>) -> Self {
        Self { key_service }
    }
}
