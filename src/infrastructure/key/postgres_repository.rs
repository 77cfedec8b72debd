//! PostgreSQL key repository implementation

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tokio::time::timeout;

use crate::domain::api_namespace::ApiId;
use crate::domain::key::{Key, KeyId, KeyRepository, Ratelimit, RatelimitKind};
use crate::domain::workspace::WorkspaceId;
use crate::domain::DomainError;

/// A commit blocked past this bound fails with a retryable storage error
/// instead of holding the request open on lock contention.
const COMMIT_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL implementation of KeyRepository
///
/// The key row and its optional ratelimit row are written in one
/// transaction; a failure on either leaves no trace of the key.
#[derive(Debug, Clone)]
pub struct PostgresKeyRepository {
    pool: PgPool,
}

impl PostgresKeyRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyRepository for PostgresKeyRepository {
    async fn insert_key_with_ratelimit(&self, key: Key) -> Result<Key, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO keys (id, hash, start, api_id, workspace_id, enabled,
                              owner_id, meta, expires_at, remaining, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(key.id().as_str())
        .bind(key.hash())
        .bind(key.start())
        .bind(key.api_id().as_str())
        .bind(key.workspace_id().as_str())
        .bind(key.is_enabled())
        .bind(key.owner_id())
        .bind(key.meta())
        .bind(key.expires_at())
        .bind(key.remaining())
        .bind(key.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::hash_collision(format!(
                    "Key '{}' conflicts with an existing row",
                    key.id().as_str()
                ))
            } else {
                DomainError::storage(format!("Failed to insert key: {}", e))
            }
        })?;

        if let Some(ratelimit) = key.ratelimit() {
            sqlx::query(
                r#"
                INSERT INTO key_ratelimits (key_id, kind, limit_value, duration_ms)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(key.id().as_str())
            .bind(kind_to_str(ratelimit.kind))
            .bind(ratelimit.limit)
            .bind(ratelimit.duration_ms)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to insert key ratelimit: {}", e)))?;
        }

        match timeout(COMMIT_TIMEOUT, tx.commit()).await {
            Ok(result) => result
                .map_err(|e| DomainError::storage(format!("Failed to commit key insert: {}", e)))?,
            Err(_) => {
                return Err(DomainError::storage(format!(
                    "Key insert commit timed out after {}ms, the request may be retried",
                    COMMIT_TIMEOUT.as_millis()
                )));
            }
        }

        Ok(key)
    }

    async fn find_by_id(&self, id: &KeyId) -> Result<Option<Key>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT k.id, k.hash, k.start, k.api_id, k.workspace_id, k.enabled,
                   k.owner_id, k.meta, k.expires_at, k.remaining, k.created_at,
                   r.kind AS ratelimit_kind, r.limit_value AS ratelimit_limit,
                   r.duration_ms AS ratelimit_duration_ms
            FROM keys k
            LEFT JOIN key_ratelimits r ON r.key_id = k.id
            WHERE k.id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get key: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_key(&row)?)),
            None => Ok(None),
        }
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Key store unreachable: {}", e)))?;

        Ok(())
    }
}

fn row_to_key(row: &sqlx::postgres::PgRow) -> Result<Key, DomainError> {
    let id: String = row.get("id");
    let hash: String = row.get("hash");
    let start: String = row.get("start");
    let api_id: String = row.get("api_id");
    let workspace_id: String = row.get("workspace_id");
    let enabled: bool = row.get("enabled");
    let owner_id: Option<String> = row.get("owner_id");
    let meta: Option<serde_json::Value> = row.get("meta");
    let expires_at: Option<chrono::DateTime<chrono::Utc>> = row.get("expires_at");
    let remaining: Option<i64> = row.get("remaining");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let ratelimit_kind: Option<String> = row.get("ratelimit_kind");
    let ratelimit_limit: Option<i64> = row.get("ratelimit_limit");
    let ratelimit_duration_ms: Option<i64> = row.get("ratelimit_duration_ms");

    let key_id = KeyId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid key ID in database: {}", e)))?;
    let api_id = ApiId::new(&api_id)
        .map_err(|e| DomainError::storage(format!("Invalid API ID in database: {}", e)))?;

    let mut key = Key::new(key_id, hash, start, api_id, WorkspaceId::new(workspace_id))
        .with_enabled(enabled)
        .with_created_at(created_at);

    if let Some(owner_id) = owner_id {
        key = key.with_owner_id(owner_id);
    }
    if let Some(meta) = meta {
        key = key.with_meta(meta);
    }
    if let Some(expires_at) = expires_at {
        key = key.with_expiration(expires_at);
    }
    if let Some(remaining) = remaining {
        key = key.with_remaining(remaining);
    }
    if let (Some(kind), Some(limit), Some(duration_ms)) =
        (ratelimit_kind, ratelimit_limit, ratelimit_duration_ms)
    {
        key = key.with_ratelimit(Ratelimit {
            kind: str_to_kind(&kind),
            limit,
            duration_ms,
        });
    }

    Ok(key)
}

fn kind_to_str(kind: RatelimitKind) -> &'static str {
    match kind {
        RatelimitKind::Fast => "fast",
        RatelimitKind::Consistent => "consistent",
    }
}

fn str_to_kind(s: &str) -> RatelimitKind {
    match s {
        "consistent" => RatelimitKind::Consistent,
        _ => RatelimitKind::Fast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_conversion() {
        assert_eq!(kind_to_str(RatelimitKind::Fast), "fast");
        assert_eq!(kind_to_str(RatelimitKind::Consistent), "consistent");

        assert_eq!(str_to_kind("fast"), RatelimitKind::Fast);
        assert_eq!(str_to_kind("consistent"), RatelimitKind::Consistent);
        assert_eq!(str_to_kind("unknown"), RatelimitKind::Fast);
    }
}
