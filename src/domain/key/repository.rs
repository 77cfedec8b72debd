//! Key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Key, KeyId};
use crate::domain::DomainError;

/// Repository trait for key storage
#[async_trait]
pub trait KeyRepository: Send + Sync + Debug {
    /// Insert a new key together with its optional rate-limit policy
    ///
    /// Both records commit atomically or not at all. A uniqueness violation
    /// on `hash` surfaces as [`DomainError::HashCollision`] so the engine
    /// can regenerate; it must never overwrite the existing key.
    async fn insert_key_with_ratelimit(&self, key: Key) -> Result<Key, DomainError>;

    /// Get a key by its ID
    async fn find_by_id(&self, id: &KeyId) -> Result<Option<Key>, DomainError>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}
