//! Root key entity and related types

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::workspace::WorkspaceId;

/// Root key identifier
///
/// Never parsed from the wire; root keys are looked up by digest, so the ID
/// only appears in storage and logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RootKeyId(String);

impl RootKeyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(format!("root_{}", Uuid::new_v4().simple()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RootKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability granted to a root key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Mint new API keys
    CreateKey,
    /// Read API namespace details
    ReadApi,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateKey => "create_key",
            Self::ReadApi => "read_api",
        }
    }

    /// Parse a stored permission string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create_key" => Some(Self::CreateKey),
            "read_api" => Some(Self::ReadApi),
            _ => None,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Root key entity
///
/// The plaintext credential is never held here; `hash` is the URL-safe
/// base64-encoded SHA-256 digest of the token the caller presents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootKey {
    /// Unique identifier
    id: RootKeyId,
    /// Digest of the bearer credential
    hash: String,
    /// Workspace this root key acts on behalf of
    workspace_id: WorkspaceId,
    /// Capabilities granted to this key
    permissions: HashSet<Permission>,
    /// Revocation timestamp (None = not revoked)
    #[serde(skip_serializing_if = "Option::is_none")]
    revoked_at: Option<DateTime<Utc>>,
    /// Expiration timestamp (None = never expires)
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl RootKey {
    /// Create a new root key record
    pub fn new(id: RootKeyId, hash: impl Into<String>, workspace_id: WorkspaceId) -> Self {
        Self {
            id,
            hash: hash.into(),
            workspace_id,
            permissions: HashSet::new(),
            revoked_at: None,
            expires_at: None,
            created_at: Utc::now(),
        }
    }

    /// Grant a capability
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.insert(permission);
        self
    }

    /// Replace the capability set
    pub fn with_permissions(mut self, permissions: HashSet<Permission>) -> Self {
        self.permissions = permissions;
        self
    }

    /// Set expiration
    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Restore the revocation timestamp, used when loading from storage
    pub fn with_revoked_at(mut self, revoked_at: Option<DateTime<Utc>>) -> Self {
        self.revoked_at = revoked_at;
        self
    }

    /// Restore the creation timestamp, used when loading from storage
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn id(&self) -> &RootKeyId {
        &self.id
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    pub fn permissions(&self) -> &HashSet<Permission> {
        &self.permissions
    }

    pub fn revoked_at(&self) -> Option<DateTime<Utc>> {
        self.revoked_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check if a capability has been granted
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Check if the key can mint new API keys
    pub fn can_create_keys(&self) -> bool {
        self.has_permission(Permission::CreateKey)
    }

    /// Check if the key has been revoked
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Check if the key has expired
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            Utc::now() >= expires_at
        } else {
            false
        }
    }

    /// Check if the key is currently valid and usable
    pub fn is_valid(&self) -> bool {
        !self.is_revoked() && !self.is_expired()
    }

    /// Revoke the key
    pub fn revoke(&mut self) {
        self.revoked_at = Some(Utc::now());
    }
}
