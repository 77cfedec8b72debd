//! Key creation validation
//!
//! Pure checks only: nothing here touches storage or randomness, so a
//! rejected request provably has no side effects.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::entity::{Ratelimit, RatelimitKind};
use super::request::{CreateKeyParams, CreateKeyRequest, RatelimitRequest};
use crate::domain::api_namespace::{ApiId, ApiNamespaceValidationError};

/// Errors that can occur during key request validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeyValidationError {
    #[error(transparent)]
    InvalidApiId(#[from] ApiNamespaceValidationError),

    #[error("keyId cannot be empty")]
    EmptyKeyId,

    #[error("keyId exceeds maximum length of {0} characters")]
    KeyIdTooLong(usize),

    #[error("keyId contains invalid character: '{0}'. Only alphanumeric characters, hyphens and underscores are allowed")]
    KeyIdInvalidCharacter(char),

    #[error("byteLength must be between {min} and {max}")]
    ByteLengthOutOfRange { min: i64, max: i64 },

    #[error("prefix cannot be empty")]
    EmptyPrefix,

    #[error("prefix exceeds maximum length of {0} characters")]
    PrefixTooLong(usize),

    #[error("prefix contains invalid character: '{0}'. Only alphanumeric characters, hyphens and underscores are allowed")]
    PrefixInvalidCharacter(char),

    #[error("ownerId cannot be empty")]
    EmptyOwnerId,

    #[error("ownerId exceeds maximum length of {0} characters")]
    OwnerIdTooLong(usize),

    #[error("meta must be a JSON object")]
    MetaNotAnObject,

    #[error("expires is not a valid unix millisecond timestamp")]
    ExpiresInvalid,

    #[error("expires must be in the future")]
    ExpiresInPast,

    #[error("remaining must be greater than zero")]
    RemainingNotPositive,

    #[error("ratelimit.type must be 'fast' or 'consistent', got '{0}'")]
    UnknownRatelimitType(String),

    #[error("ratelimit.limit must be greater than zero")]
    RatelimitLimitNotPositive,

    #[error("ratelimit.duration must be greater than zero")]
    RatelimitDurationNotPositive,
}

/// Smallest accepted `byteLength`
pub const MIN_KEY_BYTES: i64 = 1;
/// Largest accepted `byteLength`
pub const MAX_KEY_BYTES: i64 = 255;
/// Longest accepted `prefix`
pub const MAX_PREFIX_LENGTH: usize = 16;

const MAX_KEY_ID_LENGTH: usize = 64;
const MAX_OWNER_ID_LENGTH: usize = 256;

/// Validate a key ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters
/// - Only alphanumeric characters, hyphens and underscores
pub fn validate_key_id(id: &str) -> Result<(), KeyValidationError> {
    if id.is_empty() {
        return Err(KeyValidationError::EmptyKeyId);
    }

    if id.len() > MAX_KEY_ID_LENGTH {
        return Err(KeyValidationError::KeyIdTooLong(MAX_KEY_ID_LENGTH));
    }

    for c in id.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
            return Err(KeyValidationError::KeyIdInvalidCharacter(c));
        }
    }

    Ok(())
}

/// Validate a user-supplied key prefix
///
/// The prefix ends up in both the plaintext token and the stored `start`
/// fragment, so the charset is restricted to printable token characters.
pub fn validate_prefix(prefix: &str) -> Result<(), KeyValidationError> {
    if prefix.is_empty() {
        return Err(KeyValidationError::EmptyPrefix);
    }

    if prefix.len() > MAX_PREFIX_LENGTH {
        return Err(KeyValidationError::PrefixTooLong(MAX_PREFIX_LENGTH));
    }

    for c in prefix.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
            return Err(KeyValidationError::PrefixInvalidCharacter(c));
        }
    }

    Ok(())
}

/// Validate a raw creation request into typed parameters
///
/// Applies the contract defaults (`enabled` absent means `true`) but leaves
/// `byte_length` unresolved so the engine's configured default applies.
pub fn validate_create_key(
    request: CreateKeyRequest,
) -> Result<CreateKeyParams, KeyValidationError> {
    let CreateKeyRequest {
        api_id,
        byte_length,
        prefix,
        enabled,
        owner_id,
        meta,
        expires,
        remaining,
        ratelimit,
    } = request;

    let api_id = ApiId::new(api_id)?;

    let byte_length = match byte_length {
        None => None,
        Some(n) if (MIN_KEY_BYTES..=MAX_KEY_BYTES).contains(&n) => Some(n as usize),
        Some(_) => {
            return Err(KeyValidationError::ByteLengthOutOfRange {
                min: MIN_KEY_BYTES,
                max: MAX_KEY_BYTES,
            });
        }
    };

    if let Some(prefix) = &prefix {
        validate_prefix(prefix)?;
    }

    let owner_id = match owner_id {
        None => None,
        Some(owner_id) => {
            if owner_id.is_empty() {
                return Err(KeyValidationError::EmptyOwnerId);
            }
            if owner_id.len() > MAX_OWNER_ID_LENGTH {
                return Err(KeyValidationError::OwnerIdTooLong(MAX_OWNER_ID_LENGTH));
            }
            Some(owner_id)
        }
    };

    let meta = match meta {
        None => None,
        Some(value) if value.is_object() => Some(value),
        Some(_) => return Err(KeyValidationError::MetaNotAnObject),
    };

    let expires_at = match expires {
        None => None,
        Some(millis) => {
            let at = DateTime::<Utc>::from_timestamp_millis(millis)
                .ok_or(KeyValidationError::ExpiresInvalid)?;
            if at <= Utc::now() {
                return Err(KeyValidationError::ExpiresInPast);
            }
            Some(at)
        }
    };

    let remaining = match remaining {
        None => None,
        Some(n) if n > 0 => Some(n),
        Some(_) => return Err(KeyValidationError::RemainingNotPositive),
    };

    let ratelimit = match ratelimit {
        None => None,
        Some(raw) => Some(validate_ratelimit(&raw)?),
    };

    Ok(CreateKeyParams {
        api_id,
        byte_length,
        prefix,
        enabled: enabled.unwrap_or(true),
        owner_id,
        meta,
        expires_at,
        remaining,
        ratelimit,
    })
}

fn validate_ratelimit(raw: &RatelimitRequest) -> Result<Ratelimit, KeyValidationError> {
    let kind = RatelimitKind::parse(&raw.kind)
        .ok_or_else(|| KeyValidationError::UnknownRatelimitType(raw.kind.clone()))?;

    if raw.limit <= 0 {
        return Err(KeyValidationError::RatelimitLimitNotPositive);
    }

    if raw.duration <= 0 {
        return Err(KeyValidationError::RatelimitDurationNotPositive);
    }

    Ok(Ratelimit {
        kind,
        limit: raw.limit,
        duration_ms: raw.duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_request() -> CreateKeyRequest {
        CreateKeyRequest::new("api_123")
    }

    #[test]
    fn test_minimal_request_is_valid() {
        let params = validate_create_key(base_request()).unwrap();
        assert_eq!(params.api_id.as_str(), "api_123");
        assert!(params.byte_length.is_none());
        assert!(params.enabled);
        assert!(params.ratelimit.is_none());
    }

    #[test]
    fn test_enabled_defaults_to_true() {
        let params = validate_create_key(base_request()).unwrap();
        assert!(params.enabled);

        let mut request = base_request();
        request.enabled = Some(false);
        assert!(!validate_create_key(request).unwrap().enabled);

        let mut request = base_request();
        request.enabled = Some(true);
        assert!(validate_create_key(request).unwrap().enabled);
    }

    #[test]
    fn test_empty_api_id_rejected() {
        let request = CreateKeyRequest::new("");
        assert!(matches!(
            validate_create_key(request),
            Err(KeyValidationError::InvalidApiId(_))
        ));
    }

    #[test]
    fn test_byte_length_bounds() {
        for n in [MIN_KEY_BYTES, 16, MAX_KEY_BYTES] {
            let mut request = base_request();
            request.byte_length = Some(n);
            let params = validate_create_key(request).unwrap();
            assert_eq!(params.byte_length, Some(n as usize));
        }

        for n in [0, -1, MAX_KEY_BYTES + 1] {
            let mut request = base_request();
            request.byte_length = Some(n);
            assert_eq!(
                validate_create_key(request),
                Err(KeyValidationError::ByteLengthOutOfRange {
                    min: MIN_KEY_BYTES,
                    max: MAX_KEY_BYTES,
                })
            );
        }
    }

    #[test]
    fn test_prefix_charset() {
        let mut request = base_request();
        request.prefix = Some("prod-api_v2".to_string());
        assert!(validate_create_key(request).is_ok());

        let mut request = base_request();
        request.prefix = Some("bad prefix".to_string());
        assert_eq!(
            validate_create_key(request),
            Err(KeyValidationError::PrefixInvalidCharacter(' '))
        );

        let mut request = base_request();
        request.prefix = Some("p".repeat(MAX_PREFIX_LENGTH + 1));
        assert_eq!(
            validate_create_key(request),
            Err(KeyValidationError::PrefixTooLong(MAX_PREFIX_LENGTH))
        );
    }

    #[test]
    fn test_unknown_ratelimit_type_rejected() {
        let mut request = base_request();
        request.ratelimit = Some(RatelimitRequest {
            kind: "x".to_string(),
            limit: 10,
            duration: 1000,
        });

        assert_eq!(
            validate_create_key(request),
            Err(KeyValidationError::UnknownRatelimitType("x".to_string()))
        );
    }

    #[test]
    fn test_ratelimit_bounds() {
        let mut request = base_request();
        request.ratelimit = Some(RatelimitRequest {
            kind: "consistent".to_string(),
            limit: 0,
            duration: 1000,
        });
        assert_eq!(
            validate_create_key(request),
            Err(KeyValidationError::RatelimitLimitNotPositive)
        );

        let mut request = base_request();
        request.ratelimit = Some(RatelimitRequest {
            kind: "fast".to_string(),
            limit: 10,
            duration: -5,
        });
        assert_eq!(
            validate_create_key(request),
            Err(KeyValidationError::RatelimitDurationNotPositive)
        );
    }

    #[test]
    fn test_valid_ratelimit_becomes_typed() {
        let mut request = base_request();
        request.ratelimit = Some(RatelimitRequest {
            kind: "consistent".to_string(),
            limit: 10,
            duration: 60_000,
        });

        let params = validate_create_key(request).unwrap();
        let ratelimit = params.ratelimit.unwrap();
        assert_eq!(ratelimit.kind, RatelimitKind::Consistent);
        assert_eq!(ratelimit.limit, 10);
        assert_eq!(ratelimit.duration_ms, 60_000);
    }

    #[test]
    fn test_meta_must_be_object() {
        let mut request = base_request();
        request.meta = Some(serde_json::json!({"plan": "pro"}));
        assert!(validate_create_key(request).is_ok());

        let mut request = base_request();
        request.meta = Some(serde_json::json!(["not", "an", "object"]));
        assert_eq!(
            validate_create_key(request),
            Err(KeyValidationError::MetaNotAnObject)
        );
    }

    #[test]
    fn test_expires_must_be_future() {
        let mut request = base_request();
        request.expires = Some((Utc::now() + Duration::hours(1)).timestamp_millis());
        let params = validate_create_key(request).unwrap();
        assert!(params.expires_at.is_some());

        let mut request = base_request();
        request.expires = Some((Utc::now() - Duration::hours(1)).timestamp_millis());
        assert_eq!(
            validate_create_key(request),
            Err(KeyValidationError::ExpiresInPast)
        );
    }

    #[test]
    fn test_remaining_must_be_positive() {
        let mut request = base_request();
        request.remaining = Some(100);
        assert_eq!(
            validate_create_key(request).unwrap().remaining,
            Some(100)
        );

        let mut request = base_request();
        request.remaining = Some(0);
        assert_eq!(
            validate_create_key(request),
            Err(KeyValidationError::RemainingNotPositive)
        );
    }

    #[test]
    fn test_owner_id_bounds() {
        let mut request = base_request();
        request.owner_id = Some(String::new());
        assert_eq!(
            validate_create_key(request),
            Err(KeyValidationError::EmptyOwnerId)
        );

        let mut request = base_request();
        request.owner_id = Some("o".repeat(257));
        assert_eq!(
            validate_create_key(request),
            Err(KeyValidationError::OwnerIdTooLong(256))
        );
    }

    #[test]
    fn test_key_id_validation() {
        assert!(validate_key_id("key_7fj2m").is_ok());
        assert_eq!(validate_key_id(""), Err(KeyValidationError::EmptyKeyId));
        assert_eq!(
            validate_key_id("key!"),
            Err(KeyValidationError::KeyIdInvalidCharacter('!'))
        );
    }
}
