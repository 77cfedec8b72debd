//! Key issuance service
//!
//! The end-to-end engine: validate the request, authorize the caller's root
//! key, generate and hash fresh key material, persist atomically. Ordering
//! is load-bearing: no randomness is drawn and no storage is written for a
//! request that fails validation or authorization.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::api_namespace::ApiNamespaceRepository;
use crate::domain::key::{
    validate_create_key, CreateKeyParams, CreateKeyRequest, Key, KeyId, KeyRepository,
};
use crate::domain::root_key::{RootKey, RootKeyRepository};
use crate::domain::workspace::WorkspaceId;
use crate::domain::DomainError;

use super::generator::KeyMaterialGenerator;
use super::hasher::hash_key;

/// Tunables for the issuance engine, fixed at construction
#[derive(Debug, Clone)]
pub struct IssuanceConfig {
    /// Bytes of entropy when the request does not specify `byteLength`
    pub default_byte_length: usize,
    /// Encoded characters exposed in the stored `start` fragment
    pub start_chars: usize,
    /// Generation attempts before a hash collision becomes an internal error
    pub max_insert_attempts: u32,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            default_byte_length: 16,
            start_chars: 4,
            max_insert_attempts: 3,
        }
    }
}

/// Result of issuing a new key
#[derive(Debug)]
pub struct IssuedKey {
    /// The persisted key record
    pub key: Key,
    /// The full plaintext token, returned to the caller exactly once
    pub plaintext: String,
}

/// Key issuance service
#[derive(Debug)]
pub struct KeyIssuanceService<K, R, N>
where
    K: KeyRepository,
    R: RootKeyRepository,
    N: ApiNamespaceRepository,
{
    keys: Arc<K>,
    root_keys: Arc<R>,
    namespaces: Arc<N>,
    generator: KeyMaterialGenerator,
    config: IssuanceConfig,
}

impl<K, R, N> KeyIssuanceService<K, R, N>
where
    K: KeyRepository,
    R: RootKeyRepository,
    N: ApiNamespaceRepository,
{
    /// Create a new issuance service
    pub fn new(keys: Arc<K>, root_keys: Arc<R>, namespaces: Arc<N>, config: IssuanceConfig) -> Self {
        let generator = KeyMaterialGenerator::new(config.start_chars);
        Self {
            keys,
            root_keys,
            namespaces,
            generator,
            config,
        }
    }

    /// Issue a new key
    ///
    /// `bearer` is the caller's root credential exactly as presented. It is
    /// digested for lookup and then dropped; it must never reach a log line
    /// or the stores.
    pub async fn create_key(
        &self,
        bearer: &str,
        request: CreateKeyRequest,
    ) -> Result<IssuedKey, DomainError> {
        let params =
            validate_create_key(request).map_err(|e| DomainError::validation(e.to_string()))?;

        let root_key = self.authorize(bearer, &params).await?;

        let byte_length = params
            .byte_length
            .unwrap_or(self.config.default_byte_length);

        let mut attempts = 0u32;
        loop {
            attempts += 1;

            let material = self.generator.generate(byte_length, params.prefix.as_deref());
            let digest = hash_key(&material.plaintext);
            let key = self.assemble_key(&params, root_key.workspace_id(), digest, material.start);

            match self.keys.insert_key_with_ratelimit(key).await {
                Ok(created) => {
                    info!(
                        "Key issued: id={}, api_id={}, workspace_id={}",
                        created.id(),
                        created.api_id(),
                        created.workspace_id()
                    );
                    return Ok(IssuedKey {
                        key: created,
                        plaintext: material.plaintext,
                    });
                }
                Err(DomainError::HashCollision { message })
                    if attempts < self.config.max_insert_attempts =>
                {
                    warn!(
                        "Hash collision on insert, regenerating: attempt={}, {}",
                        attempts, message
                    );
                }
                Err(DomainError::HashCollision { message }) => {
                    warn!(
                        "Hash collision retry budget exhausted: attempts={}, {}",
                        attempts, message
                    );
                    return Err(DomainError::internal(
                        "Key generation failed after repeated hash collisions",
                    ));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Look up an issued key record
    pub async fn get_key(&self, id: &KeyId) -> Result<Option<Key>, DomainError> {
        self.keys.find_by_id(id).await
    }

    /// Check that every backing store is reachable
    pub async fn ping_stores(&self) -> Result<(), DomainError> {
        self.keys.ping().await?;
        self.root_keys.ping().await?;
        self.namespaces.ping().await
    }

    /// Resolve and check the caller's root key against the target namespace
    async fn authorize(
        &self,
        bearer: &str,
        params: &CreateKeyParams,
    ) -> Result<RootKey, DomainError> {
        let digest = hash_key(bearer);

        let root_key = self
            .root_keys
            .find_by_hash(&digest)
            .await?
            .ok_or_else(|| DomainError::authentication("Root key not recognized"))?;

        if !root_key.is_valid() {
            debug!(
                "Root key rejected: id={}, revoked={}, expired={}",
                root_key.id(),
                root_key.is_revoked(),
                root_key.is_expired()
            );
            return Err(DomainError::authentication("Root key is revoked or expired"));
        }

        let namespace = self
            .namespaces
            .find_by_id(&params.api_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("API namespace '{}' not found", params.api_id))
            })?;

        if !namespace.is_owned_by(root_key.workspace_id()) {
            debug!(
                "Workspace mismatch: root_key_workspace={}, namespace_workspace={}",
                root_key.workspace_id(),
                namespace.workspace_id()
            );
            return Err(DomainError::forbidden(
                "Root key workspace does not own the target namespace",
            ));
        }

        if !root_key.can_create_keys() {
            return Err(DomainError::forbidden(
                "Root key lacks the create_key permission",
            ));
        }

        Ok(root_key)
    }

    fn assemble_key(
        &self,
        params: &CreateKeyParams,
        workspace_id: &WorkspaceId,
        hash: String,
        start: String,
    ) -> Key {
        let mut key = Key::new(
            KeyId::generate(),
            hash,
            start,
            params.api_id.clone(),
            workspace_id.clone(),
        )
        .with_enabled(params.enabled);

        if let Some(owner_id) = &params.owner_id {
            key = key.with_owner_id(owner_id);
        }
        if let Some(meta) = &params.meta {
            key = key.with_meta(meta.clone());
        }
        if let Some(expires_at) = params.expires_at {
            key = key.with_expiration(expires_at);
        }
        if let Some(remaining) = params.remaining {
            key = key.with_remaining(remaining);
        }
        if let Some(ratelimit) = params.ratelimit {
            key = key.with_ratelimit(ratelimit);
        }

        key
    }
}
