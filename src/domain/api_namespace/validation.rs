//! API namespace validation utilities

use thiserror::Error;

/// Errors that can occur during API namespace validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiNamespaceValidationError {
    #[error("apiId cannot be empty")]
    EmptyId,

    #[error("apiId exceeds maximum length of {0} characters")]
    TooLong(usize),

    #[error("apiId contains invalid character: '{0}'. Only alphanumeric characters, hyphens and underscores are allowed")]
    InvalidCharacter(char),

    #[error("namespace name cannot be empty")]
    EmptyName,

    #[error("namespace name exceeds maximum length of {0} characters")]
    NameTooLong(usize),
}

const MAX_API_ID_LENGTH: usize = 64;
const MAX_NAMESPACE_NAME_LENGTH: usize = 128;

/// Validate an API namespace ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters
/// - Only alphanumeric characters, hyphens and underscores
pub fn validate_api_id(id: &str) -> Result<(), ApiNamespaceValidationError> {
    if id.is_empty() {
        return Err(ApiNamespaceValidationError::EmptyId);
    }

    if id.len() > MAX_API_ID_LENGTH {
        return Err(ApiNamespaceValidationError::TooLong(MAX_API_ID_LENGTH));
    }

    for c in id.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
            return Err(ApiNamespaceValidationError::InvalidCharacter(c));
        }
    }

    Ok(())
}

/// Validate an API namespace display name
pub fn validate_namespace_name(name: &str) -> Result<(), ApiNamespaceValidationError> {
    if name.trim().is_empty() {
        return Err(ApiNamespaceValidationError::EmptyName);
    }

    if name.len() > MAX_NAMESPACE_NAME_LENGTH {
        return Err(ApiNamespaceValidationError::NameTooLong(
            MAX_NAMESPACE_NAME_LENGTH,
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_api_ids() {
        assert!(validate_api_id("api_123").is_ok());
        assert!(validate_api_id("my-api").is_ok());
        assert!(validate_api_id("a").is_ok());
        assert!(validate_api_id("API-Upper_0").is_ok());
    }

    #[test]
    fn test_empty_api_id() {
        assert_eq!(
            validate_api_id(""),
            Err(ApiNamespaceValidationError::EmptyId)
        );
    }

    #[test]
    fn test_api_id_too_long() {
        let long_id = "a".repeat(65);
        assert_eq!(
            validate_api_id(&long_id),
            Err(ApiNamespaceValidationError::TooLong(64))
        );
    }

    #[test]
    fn test_api_id_invalid_character() {
        assert_eq!(
            validate_api_id("api.123"),
            Err(ApiNamespaceValidationError::InvalidCharacter('.'))
        );
        assert_eq!(
            validate_api_id("api 123"),
            Err(ApiNamespaceValidationError::InvalidCharacter(' '))
        );
    }

    #[test]
    fn test_namespace_name() {
        assert!(validate_namespace_name("billing").is_ok());
        assert_eq!(
            validate_namespace_name("   "),
            Err(ApiNamespaceValidationError::EmptyName)
        );
        assert_eq!(
            validate_namespace_name(&"n".repeat(129)),
            Err(ApiNamespaceValidationError::NameTooLong(128))
        );
    }
}
