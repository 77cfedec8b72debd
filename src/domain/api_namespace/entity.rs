//! API namespace entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_api_id, validate_namespace_name, ApiNamespaceValidationError};
use crate::domain::workspace::WorkspaceId;

/// API namespace identifier - alphanumeric plus hyphens/underscores, max 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiId(String);

impl ApiId {
    /// Create a new ApiId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ApiNamespaceValidationError> {
        let id = id.into();
        validate_api_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ApiId {
    type Error = ApiNamespaceValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApiId> for String {
    fn from(id: ApiId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ApiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// API namespace entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiNamespace {
    /// Unique identifier
    id: ApiId,
    /// Workspace that owns this namespace
    workspace_id: WorkspaceId,
    /// Display name
    name: String,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl ApiNamespace {
    /// Create a new API namespace
    pub fn new(
        id: ApiId,
        workspace_id: WorkspaceId,
        name: impl Into<String>,
    ) -> Result<Self, ApiNamespaceValidationError> {
        let name = name.into();
        validate_namespace_name(&name)?;
        Ok(Self {
            id,
            workspace_id,
            name,
            created_at: Utc::now(),
        })
    }

    /// Restore the creation timestamp, used when loading from storage
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn id(&self) -> &ApiId {
        &self.id
    }

    pub fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check whether the namespace belongs to the given workspace
    pub fn is_owned_by(&self, workspace_id: &WorkspaceId) -> bool {
        &self.workspace_id == workspace_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_id_valid() {
        let id = ApiId::new("api_4vda92bgsq").unwrap();
        assert_eq!(id.as_str(), "api_4vda92bgsq");
    }

    #[test]
    fn test_api_id_invalid() {
        assert!(ApiId::new("").is_err());
        assert!(ApiId::new("api key").is_err());
        assert!(ApiId::new("a".repeat(65)).is_err());
    }

    #[test]
    fn test_namespace_ownership() {
        let ns = ApiNamespace::new(
            ApiId::new("api_1").unwrap(),
            WorkspaceId::new("ws_1"),
            "payments",
        )
        .unwrap();

        assert!(ns.is_owned_by(&WorkspaceId::new("ws_1")));
        assert!(!ns.is_owned_by(&WorkspaceId::new("ws_2")));
    }

    #[test]
    fn test_namespace_rejects_blank_name() {
        let result = ApiNamespace::new(ApiId::new("api_1").unwrap(), WorkspaceId::new("ws_1"), "");
        assert!(result.is_err());
    }
}
