//! Domain layer - Core business logic and entities

pub mod api_namespace;
pub mod error;
pub mod key;
pub mod root_key;
pub mod workspace;

pub use api_namespace::{
    validate_api_id, ApiId, ApiNamespace, ApiNamespaceRepository, ApiNamespaceValidationError,
};
pub use error::DomainError;
pub use key::{
    validate_create_key, validate_key_id, CreateKeyParams, CreateKeyRequest, Key, KeyId,
    KeyRepository, KeyValidationError, Ratelimit, RatelimitKind, RatelimitRequest,
};
pub use root_key::{Permission, RootKey, RootKeyId, RootKeyRepository};
pub use workspace::WorkspaceId;
