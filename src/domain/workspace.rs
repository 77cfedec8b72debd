//! Workspace identifier shared by root keys and API namespaces

use serde::{Deserialize, Serialize};

/// Opaque identifier of the tenant workspace that owns a resource.
///
/// Workspace records themselves are managed out of band; issuance only ever
/// compares identifiers, so no structural validation is applied here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for WorkspaceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for WorkspaceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_id_round_trip() {
        let id = WorkspaceId::new("ws_demo");
        assert_eq!(id.as_str(), "ws_demo");
        assert_eq!(id.to_string(), "ws_demo");
    }

    #[test]
    fn test_workspace_id_equality() {
        assert_eq!(WorkspaceId::from("ws_a"), WorkspaceId::new("ws_a"));
        assert_ne!(WorkspaceId::from("ws_a"), WorkspaceId::new("ws_b"));
    }
}
