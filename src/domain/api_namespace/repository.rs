//! API namespace repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiId, ApiNamespace};
use crate::domain::DomainError;

/// Repository trait for API namespace lookups
///
/// Issuance only reads namespaces; creation happens out of band.
#[async_trait]
pub trait ApiNamespaceRepository: Send + Sync + Debug {
    /// Get an API namespace by its ID
    async fn find_by_id(&self, id: &ApiId) -> Result<Option<ApiNamespace>, DomainError>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}
