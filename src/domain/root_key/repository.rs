//! Root key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::RootKey;
use crate::domain::DomainError;

/// Repository trait for root key lookups
#[async_trait]
pub trait RootKeyRepository: Send + Sync + Debug {
    /// Find a root key by the digest of its bearer credential
    ///
    /// Returns `None` when no key matches; validity (revocation, expiry) is
    /// decided by the caller so revoked keys still resolve here.
    async fn find_by_hash(&self, hash: &str) -> Result<Option<RootKey>, DomainError>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}
