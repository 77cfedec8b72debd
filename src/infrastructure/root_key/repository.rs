//! In-memory root key repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::root_key::{RootKey, RootKeyRepository};
use crate::domain::DomainError;

/// In-memory implementation of RootKeyRepository
///
/// Keys are indexed by digest since that is the only lookup issuance needs.
#[derive(Debug, Default)]
pub struct InMemoryRootKeyRepository {
    keys: Arc<RwLock<HashMap<String, RootKey>>>,
}

impl InMemoryRootKeyRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a root key record
    pub async fn insert(&self, key: RootKey) {
        let mut keys = self.keys.write().await;
        keys.insert(key.hash().to_string(), key);
    }

    /// Mark the root key with the given digest as revoked
    pub async fn revoke_by_hash(&self, hash: &str) -> bool {
        let mut keys = self.keys.write().await;
        match keys.get_mut(hash) {
            Some(key) => {
                key.revoke();
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl RootKeyRepository for InMemoryRootKeyRepository {
    async fn find_by_hash(&self, hash: &str) -> Result<Option<RootKey>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.get(hash).cloned())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::root_key::{Permission, RootKeyId};
    use crate::domain::workspace::WorkspaceId;

    fn create_test_root_key(hash: &str) -> RootKey {
        RootKey::new(RootKeyId::generate(), hash, WorkspaceId::new("ws_1"))
            .with_permission(Permission::CreateKey)
    }

    #[tokio::test]
    async fn test_find_by_hash() {
        let repo = InMemoryRootKeyRepository::new();
        repo.insert(create_test_root_key("digest-1")).await;

        let found = repo.find_by_hash("digest-1").await.unwrap();
        assert!(found.is_some());
        assert!(found.unwrap().can_create_keys());

        let missing = repo.find_by_hash("digest-2").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_revoked_key_still_resolves() {
        let repo = InMemoryRootKeyRepository::new();
        repo.insert(create_test_root_key("digest-1")).await;

        assert!(repo.revoke_by_hash("digest-1").await);
        assert!(!repo.revoke_by_hash("digest-missing").await);

        // Validity is the caller's decision, the lookup still succeeds
        let found = repo.find_by_hash("digest-1").await.unwrap().unwrap();
        assert!(found.is_revoked());
        assert!(!found.is_valid());
    }
}
