//! Keymint API
//!
//! An API key issuance service:
//! - Mints opaque keys with configurable entropy and prefix
//! - Stores digests only, the plaintext leaves through the response once
//! - Authorizes callers via hashed root keys scoped to workspaces
//! - Persists keys and their rate-limit policies atomically

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use api::state::{AppState, KeyIssuanceTrait};
use config::StorageBackend;
use domain::api_namespace::{ApiId, ApiNamespace};
use domain::root_key::{Permission, RootKey, RootKeyId};
use domain::workspace::WorkspaceId;
use infrastructure::api_namespace::{
    InMemoryApiNamespaceRepository, PostgresApiNamespaceRepository,
};
use infrastructure::key::{
    hash_key, InMemoryKeyRepository, IssuanceConfig, KeyIssuanceService, PostgresKeyRepository,
};
use infrastructure::root_key::{
    CachedRootKeyRepository, InMemoryRootKeyRepository, PostgresRootKeyRepository,
};
use infrastructure::storage::{connect_pool, migrate_to_latest};

/// Create the application state with all services initialized
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let issuance = IssuanceConfig {
        default_byte_length: config.keys.default_byte_length,
        start_chars: config.keys.start_chars,
        max_insert_attempts: config.keys.max_insert_attempts,
    };
    let cache_ttl = Duration::from_secs(config.auth.root_key_cache_ttl_secs);
    let cache_capacity = config.auth.root_key_cache_capacity;

    info!("Storage backend: {:?}", config.storage.backend);

    let key_service: Arc<dyn KeyIssuanceTrait> = match config.storage.backend {
        StorageBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let pool = connect_pool(&config.storage.postgres).await?;
            migrate_to_latest(&pool).await?;
            info!("PostgreSQL connection established");

            let root_keys = PostgresRootKeyRepository::new(pool.clone());
            let namespaces = PostgresApiNamespaceRepository::new(pool.clone());

            if let Some(bootstrap) = bootstrap_from_env()? {
                info!(
                    "Registering bootstrap root key: id={}",
                    bootstrap.root_key.id()
                );
                root_keys.insert(bootstrap.root_key).await?;

                if let Some(namespace) = bootstrap.namespace {
                    info!("Registering bootstrap namespace: id={}", namespace.id());
                    namespaces.insert(namespace).await?;
                }
            }

            Arc::new(KeyIssuanceService::new(
                Arc::new(PostgresKeyRepository::new(pool)),
                Arc::new(CachedRootKeyRepository::new(
                    Arc::new(root_keys),
                    cache_ttl,
                    cache_capacity,
                )),
                Arc::new(namespaces),
                issuance,
            ))
        }
        StorageBackend::Memory => {
            let root_keys = InMemoryRootKeyRepository::new();
            let namespaces = InMemoryApiNamespaceRepository::new();

            if let Some(bootstrap) = bootstrap_from_env()? {
                info!(
                    "Registering bootstrap root key: id={}",
                    bootstrap.root_key.id()
                );
                root_keys.insert(bootstrap.root_key).await;

                if let Some(namespace) = bootstrap.namespace {
                    info!("Registering bootstrap namespace: id={}", namespace.id());
                    namespaces.insert(namespace).await;
                }
            }

            Arc::new(KeyIssuanceService::new(
                Arc::new(InMemoryKeyRepository::new()),
                Arc::new(CachedRootKeyRepository::new(
                    Arc::new(root_keys),
                    cache_ttl,
                    cache_capacity,
                )),
                Arc::new(namespaces),
                issuance,
            ))
        }
    };

    Ok(AppState::new(key_service))
}

struct BootstrapCredentials {
    root_key: RootKey,
    namespace: Option<ApiNamespace>,
}

/// Build the initial credentials from the environment
///
/// `KEYMINT_ROOT_KEY` provides the plaintext root credential; only its
/// digest is kept. `KEYMINT_WORKSPACE_ID` scopes it, and
/// `KEYMINT_BOOTSTRAP_API_ID` optionally provisions a first namespace.
fn bootstrap_from_env() -> anyhow::Result<Option<BootstrapCredentials>> {
    let Ok(root_key_value) = std::env::var("KEYMINT_ROOT_KEY") else {
        return Ok(None);
    };

    let workspace = std::env::var("KEYMINT_WORKSPACE_ID")
        .unwrap_or_else(|_| "ws_bootstrap".to_string());
    let workspace_id = WorkspaceId::new(workspace);

    let root_key = RootKey::new(
        RootKeyId::generate(),
        hash_key(&root_key_value),
        workspace_id.clone(),
    )
    .with_permission(Permission::CreateKey)
    .with_permission(Permission::ReadApi);

    let namespace = match std::env::var("KEYMINT_BOOTSTRAP_API_ID") {
        Ok(api_id) => Some(ApiNamespace::new(
            ApiId::new(api_id)?,
            workspace_id,
            "bootstrap",
        )?),
        Err(_) => None,
    };

    Ok(Some(BootstrapCredentials {
        root_key,
        namespace,
    }))
}
