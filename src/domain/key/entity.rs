//! Key entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_key_id, KeyValidationError};
use crate::domain::api_namespace::ApiId;
use crate::domain::workspace::WorkspaceId;

/// Key identifier - alphanumeric plus hyphens/underscores, max 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyId(String);

impl KeyId {
    /// Create a new KeyId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, KeyValidationError> {
        let id = id.into();
        validate_key_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(format!("key_{}", Uuid::new_v4().simple()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for KeyId {
    type Error = KeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<KeyId> for String {
    fn from(id: KeyId) -> Self {
        id.0
    }
}

impl std::fmt::Display for KeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rate-limit enforcement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatelimitKind {
    /// Enforced locally at the edge, lowest latency
    Fast,
    /// Enforced against a single consistent counter
    Consistent,
}

impl RatelimitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Consistent => "consistent",
        }
    }

    /// Parse a rate-limit mode string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fast" => Some(Self::Fast),
            "consistent" => Some(Self::Consistent),
            _ => None,
        }
    }
}

impl std::fmt::Display for RatelimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rate-limit policy attached to a key
///
/// Consumed by external enforcement systems; issuance validates and stores
/// it atomically with the key but never enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratelimit {
    /// Enforcement mode
    pub kind: RatelimitKind,
    /// Maximum number of requests per window
    pub limit: i64,
    /// Window length in milliseconds
    pub duration_ms: i64,
}

/// Key entity
///
/// Holds everything persisted about an issued key. The plaintext token never
/// lives here; `hash` is its digest and `start` a short display fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Key {
    /// Unique identifier for the key
    id: KeyId,
    /// Digest of the plaintext token; unique across all keys
    hash: String,
    /// Display fragment: optional user prefix plus the first few characters
    start: String,
    /// API namespace this key belongs to
    api_id: ApiId,
    /// Workspace that owns the namespace (denormalized for audit queries)
    workspace_id: WorkspaceId,
    /// Whether the key is usable
    enabled: bool,
    /// Caller-supplied owner reference
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_id: Option<String>,
    /// Caller-supplied metadata object
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<serde_json::Value>,
    /// Expiration timestamp (None = never expires)
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    /// Remaining verifications budget (None = unlimited)
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining: Option<i64>,
    /// Attached rate-limit policy
    #[serde(skip_serializing_if = "Option::is_none")]
    ratelimit: Option<Ratelimit>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl Key {
    /// Create a new key record
    pub fn new(
        id: KeyId,
        hash: impl Into<String>,
        start: impl Into<String>,
        api_id: ApiId,
        workspace_id: WorkspaceId,
    ) -> Self {
        Self {
            id,
            hash: hash.into(),
            start: start.into(),
            api_id,
            workspace_id,
            enabled: true,
            owner_id: None,
            meta: None,
            expires_at: None,
            remaining: None,
            ratelimit: None,
            created_at: Utc::now(),
        }
    }

    /// Set the enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the owner reference
    pub fn with_owner_id(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Set caller metadata
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Set expiration
    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Set the remaining verifications budget
    pub fn with_remaining(mut self, remaining: i64) -> Self {
        self.remaining = Some(remaining);
        self
    }

    /// Attach a rate-limit policy
    pub fn with_ratelimit(mut self, ratelimit: Ratelimit) -> Self {
        self.ratelimit = Some(ratelimit);
        self
    }

    /// Restore the creation timestamp, used when loading from storage
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn id(&self) -> &KeyId {
        &self.id
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn api_id(&self) -> &ApiId {
        &self.api_id
    }

    pub fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    pub fn meta(&self) -> Option<&serde_json::Value> {
        self.meta.as_ref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn remaining(&self) -> Option<i64> {
        self.remaining
    }

    pub fn ratelimit(&self) -> Option<&Ratelimit> {
        self.ratelimit.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_key(id: &str) -> Key {
        Key::new(
            KeyId::new(id).unwrap(),
            "digest",
            "test_abcd",
            ApiId::new("api_1").unwrap(),
            WorkspaceId::new("ws_1"),
        )
    }

    #[test]
    fn test_key_id_valid() {
        let id = KeyId::new("key_3zt1g2jpqm").unwrap();
        assert_eq!(id.as_str(), "key_3zt1g2jpqm");
    }

    #[test]
    fn test_key_id_invalid() {
        assert!(KeyId::new("").is_err());
        assert!(KeyId::new("key with spaces").is_err());
        assert!(KeyId::new("k".repeat(65)).is_err());
    }

    #[test]
    fn test_generated_key_ids_are_unique() {
        let a = KeyId::generate();
        let b = KeyId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("key_"));
    }

    #[test]
    fn test_ratelimit_kind_parse() {
        assert_eq!(RatelimitKind::parse("fast"), Some(RatelimitKind::Fast));
        assert_eq!(
            RatelimitKind::parse("consistent"),
            Some(RatelimitKind::Consistent)
        );
        assert_eq!(RatelimitKind::parse("x"), None);
        assert_eq!(RatelimitKind::parse("FAST"), None);
    }

    #[test]
    fn test_new_key_defaults() {
        let key = create_test_key("key_1");
        assert!(key.is_enabled());
        assert!(key.owner_id().is_none());
        assert!(key.ratelimit().is_none());
        assert!(key.remaining().is_none());
        assert!(key.expires_at().is_none());
    }

    #[test]
    fn test_key_builders() {
        let key = create_test_key("key_1")
            .with_enabled(false)
            .with_owner_id("customer-42")
            .with_remaining(10)
            .with_ratelimit(Ratelimit {
                kind: RatelimitKind::Fast,
                limit: 100,
                duration_ms: 60_000,
            });

        assert!(!key.is_enabled());
        assert_eq!(key.owner_id(), Some("customer-42"));
        assert_eq!(key.remaining(), Some(10));
        assert_eq!(key.ratelimit().map(|r| r.limit), Some(100));
    }
}
