//! Key creation request types
//!
//! `CreateKeyRequest` mirrors the wire contract field for field;
//! `CreateKeyParams` is the validated, strongly-typed form the issuance
//! engine consumes. The only path from one to the other is
//! [`validate_create_key`](super::validation::validate_create_key).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Ratelimit;
use crate::domain::api_namespace::ApiId;

/// Raw key creation request as received on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeyRequest {
    /// API namespace to mint the key into
    pub api_id: String,
    /// Entropy of the generated key in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_length: Option<i64>,
    /// Human-readable prefix prepended to the token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Whether the key starts out usable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Caller-side owner reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Arbitrary metadata object stored with the key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    /// Expiration as a unix timestamp in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    /// Verifications budget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<i64>,
    /// Rate-limit policy to attach
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratelimit: Option<RatelimitRequest>,
}

impl CreateKeyRequest {
    /// Create a request with only the required field set
    pub fn new(api_id: impl Into<String>) -> Self {
        Self {
            api_id: api_id.into(),
            ..Self::default()
        }
    }
}

/// Raw rate-limit descriptor as received on the wire
///
/// `kind` stays a plain string here so an unrecognized value is reported as
/// a validation failure instead of a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatelimitRequest {
    /// Enforcement mode: "fast" or "consistent"
    #[serde(rename = "type")]
    pub kind: String,
    /// Maximum number of requests per window
    pub limit: i64,
    /// Window length in milliseconds
    pub duration: i64,
}

/// Validated creation parameters
///
/// `byte_length` stays optional: the engine applies its configured default
/// so the fallback lives in exactly one place.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateKeyParams {
    pub api_id: ApiId,
    pub byte_length: Option<usize>,
    pub prefix: Option<String>,
    pub enabled: bool,
    pub owner_id: Option<String>,
    pub meta: Option<serde_json::Value>,
    pub expires_at: Option<DateTime<Utc>>,
    pub remaining: Option<i64>,
    pub ratelimit: Option<Ratelimit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_camel_case() {
        let json = r#"{
            "apiId": "api_123",
            "byteLength": 32,
            "ownerId": "customer-7",
            "ratelimit": {"type": "fast", "limit": 10, "duration": 1000}
        }"#;

        let request: CreateKeyRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.api_id, "api_123");
        assert_eq!(request.byte_length, Some(32));
        assert_eq!(request.owner_id.as_deref(), Some("customer-7"));
        let ratelimit = request.ratelimit.unwrap();
        assert_eq!(ratelimit.kind, "fast");
        assert_eq!(ratelimit.limit, 10);
        assert_eq!(ratelimit.duration, 1000);
    }

    #[test]
    fn test_request_optional_fields_default_to_none() {
        let request: CreateKeyRequest = serde_json::from_str(r#"{"apiId": "api_123"}"#).unwrap();
        assert!(request.byte_length.is_none());
        assert!(request.prefix.is_none());
        assert!(request.enabled.is_none());
        assert!(request.ratelimit.is_none());
    }

    #[test]
    fn test_unknown_ratelimit_type_still_deserializes() {
        // Rejecting "x" is validation's job, not the deserializer's
        let request: CreateKeyRequest = serde_json::from_str(
            r#"{"apiId": "api_123", "ratelimit": {"type": "x", "limit": 1, "duration": 1}}"#,
        )
        .unwrap();
        assert_eq!(request.ratelimit.unwrap().kind, "x");
    }

    #[test]
    fn test_request_serializes_without_absent_fields() {
        let json = serde_json::to_value(CreateKeyRequest::new("api_123")).unwrap();
        assert_eq!(json, serde_json::json!({"apiId": "api_123"}));
    }
}
