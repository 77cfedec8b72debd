//! PostgreSQL root key repository implementation

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::root_key::{Permission, RootKey, RootKeyId, RootKeyRepository};
use crate::domain::workspace::WorkspaceId;
use crate::domain::DomainError;

/// PostgreSQL implementation of RootKeyRepository
#[derive(Debug, Clone)]
pub struct PostgresRootKeyRepository {
    pool: PgPool,
}

impl PostgresRootKeyRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a root key, used when provisioning credentials at startup
    pub async fn insert(&self, root_key: RootKey) -> Result<RootKey, DomainError> {
        let permissions = permissions_to_json(root_key.permissions());

        sqlx::query(
            r#"
            INSERT INTO root_keys (id, hash, workspace_id, permissions,
                                   revoked_at, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (hash) DO NOTHING
            "#,
        )
        .bind(root_key.id().as_str())
        .bind(root_key.hash())
        .bind(root_key.workspace_id().as_str())
        .bind(&permissions)
        .bind(root_key.revoked_at())
        .bind(root_key.expires_at())
        .bind(root_key.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to insert root key: {}", e)))?;

        Ok(root_key)
    }

    /// Mark the root key with the given digest as revoked
    pub async fn revoke_by_hash(&self, hash: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE root_keys SET revoked_at = NOW() WHERE hash = $1 AND revoked_at IS NULL",
        )
        .bind(hash)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to revoke root key: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RootKeyRepository for PostgresRootKeyRepository {
    async fn find_by_hash(&self, hash: &str) -> Result<Option<RootKey>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, hash, workspace_id, permissions, revoked_at, expires_at, created_at
            FROM root_keys
            WHERE hash = $1
            "#,
        )
        .bind(hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get root key: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_root_key(&row)?)),
            None => Ok(None),
        }
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Root key store unreachable: {}", e)))?;

        Ok(())
    }
}

fn row_to_root_key(row: &sqlx::postgres::PgRow) -> Result<RootKey, DomainError> {
    let id: String = row.get("id");
    let hash: String = row.get("hash");
    let workspace_id: String = row.get("workspace_id");
    let permissions: serde_json::Value = row.get("permissions");
    let revoked_at: Option<chrono::DateTime<chrono::Utc>> = row.get("revoked_at");
    let expires_at: Option<chrono::DateTime<chrono::Utc>> = row.get("expires_at");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    let mut root_key = RootKey::new(RootKeyId::new(id), hash, WorkspaceId::new(workspace_id))
        .with_permissions(json_to_permissions(&permissions))
        .with_revoked_at(revoked_at)
        .with_created_at(created_at);

    if let Some(expires_at) = expires_at {
        root_key = root_key.with_expiration(expires_at);
    }

    Ok(root_key)
}

fn permissions_to_json(permissions: &HashSet<Permission>) -> serde_json::Value {
    let mut names: Vec<&str> = permissions.iter().map(|p| p.as_str()).collect();
    names.sort_unstable();
    serde_json::json!(names)
}

/// Unrecognized permission names grant nothing and are dropped
fn json_to_permissions(value: &serde_json::Value) -> HashSet<Permission> {
    value
        .as_array()
        .map(|names| {
            names
                .iter()
                .filter_map(|name| name.as_str())
                .filter_map(Permission::parse)
                .collect()
        })
        .unwrap_or_default()
}
