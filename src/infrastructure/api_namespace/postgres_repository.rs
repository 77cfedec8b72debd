//! PostgreSQL API namespace repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::api_namespace::{ApiId, ApiNamespace, ApiNamespaceRepository};
use crate::domain::workspace::WorkspaceId;
use crate::domain::DomainError;

/// PostgreSQL implementation of ApiNamespaceRepository
#[derive(Debug, Clone)]
pub struct PostgresApiNamespaceRepository {
    pool: PgPool,
}

impl PostgresApiNamespaceRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a namespace, used when provisioning workspaces at startup
    pub async fn insert(&self, namespace: ApiNamespace) -> Result<ApiNamespace, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO api_namespaces (id, workspace_id, name, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(namespace.id().as_str())
        .bind(namespace.workspace_id().as_str())
        .bind(namespace.name())
        .bind(namespace.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to insert namespace: {}", e)))?;

        Ok(namespace)
    }
}

#[async_trait]
impl ApiNamespaceRepository for PostgresApiNamespaceRepository {
    async fn find_by_id(&self, id: &ApiId) -> Result<Option<ApiNamespace>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, workspace_id, name, created_at
            FROM api_namespaces
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get namespace: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_namespace(&row)?)),
            None => Ok(None),
        }
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Namespace store unreachable: {}", e)))?;

        Ok(())
    }
}

fn row_to_namespace(row: &sqlx::postgres::PgRow) -> Result<ApiNamespace, DomainError> {
    let id: String = row.get("id");
    let workspace_id: String = row.get("workspace_id");
    let name: String = row.get("name");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    let api_id = ApiId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid API ID in database: {}", e)))?;

    let namespace = ApiNamespace::new(api_id, WorkspaceId::new(workspace_id), name)
        .map_err(|e| DomainError::storage(format!("Invalid namespace in database: {}", e)))?
        .with_created_at(created_at);

    Ok(namespace)
}
