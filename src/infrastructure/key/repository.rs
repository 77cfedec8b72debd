//! In-memory key repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::key::{Key, KeyId, KeyRepository};
use crate::domain::DomainError;

/// In-memory implementation of KeyRepository
///
/// Mirrors the relational store's semantics: an insert whose digest (or id)
/// already exists fails with `HashCollision` and leaves the stored record
/// untouched. Backs the "memory" storage backend and the engine tests.
#[derive(Debug, Default)]
pub struct InMemoryKeyRepository {
    keys: Arc<RwLock<HashMap<String, Key>>>,
    hash_index: Arc<RwLock<HashMap<String, String>>>,
    collisions_to_force: Arc<RwLock<u32>>,
}

impl InMemoryKeyRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the next `count` inserts to report a hash collision
    ///
    /// Lets callers exercise the engine's regeneration path without hunting
    /// for an actual SHA-256 collision.
    pub async fn force_hash_collisions(&self, count: u32) {
        *self.collisions_to_force.write().await = count;
    }

    /// Number of stored keys
    pub async fn count(&self) -> usize {
        self.keys.read().await.len()
    }

    /// Look up a key by its stored digest
    pub async fn find_by_hash(&self, hash: &str) -> Option<Key> {
        let hash_index = self.hash_index.read().await;
        let id = hash_index.get(hash)?;
        self.keys.read().await.get(id).cloned()
    }

    async fn take_forced_collision(&self) -> bool {
        let mut remaining = self.collisions_to_force.write().await;
        if *remaining > 0 {
            *remaining -= 1;
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl KeyRepository for InMemoryKeyRepository {
    async fn insert_key_with_ratelimit(&self, key: Key) -> Result<Key, DomainError> {
        if self.take_forced_collision().await {
            return Err(DomainError::hash_collision("forced hash collision"));
        }

        let mut keys = self.keys.write().await;
        let mut hash_index = self.hash_index.write().await;

        let id = key.id().as_str().to_string();
        let hash = key.hash().to_string();

        if hash_index.contains_key(&hash) {
            return Err(DomainError::hash_collision(
                "a key with this hash already exists",
            ));
        }

        if keys.contains_key(&id) {
            return Err(DomainError::hash_collision(format!(
                "key id '{}' already exists",
                id
            )));
        }

        hash_index.insert(hash, id.clone());
        keys.insert(id, key.clone());

        Ok(key)
    }

    async fn find_by_id(&self, id: &KeyId) -> Result<Option<Key>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.get(id.as_str()).cloned())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
