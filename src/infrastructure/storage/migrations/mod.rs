//! Versioned schema migrations
//!
//! Each migration carries its up and down SQL compiled into the binary.
//! Applied versions are tracked in `_migrations`; a migration and its
//! bookkeeping row commit in one transaction, so a failed script leaves
//! no record behind.

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// One schema revision with the SQL to enter and leave it
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub up: &'static str,
    pub down: &'static str,
}

/// Applies and reverts [`Migration`]s against a single pool
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies every migration not yet recorded, in the order given
    ///
    /// Returns how many migrations ran.
    pub async fn apply_pending(&self, migrations: &[Migration]) -> Result<usize, DomainError> {
        self.ensure_version_table().await?;
        let applied = self.applied_versions().await?;

        let mut ran = 0;
        for migration in migrations {
            if applied.contains(&migration.version) {
                continue;
            }
            self.apply(migration).await?;
            ran += 1;
        }

        Ok(ran)
    }

    /// Reverts the newest applied migration and returns its version
    pub async fn revert_latest(
        &self,
        migrations: &[Migration],
    ) -> Result<Option<i64>, DomainError> {
        let Some(version) = self.current_version().await? else {
            return Ok(None);
        };

        let migration = migrations
            .iter()
            .find(|m| m.version == version)
            .ok_or_else(|| {
                DomainError::storage(format!("No migration definition for version {}", version))
            })?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Could not open a transaction: {}", e)))?;

        sqlx::raw_sql(migration.down)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Revert of version {} failed: {}", version, e))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Could not delete the version record: {}", e))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Could not commit the revert: {}", e)))?;

        info!(version, "Reverted migration");
        Ok(Some(version))
    }

    /// Newest version recorded in `_migrations`, `None` on a fresh database
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_version_table().await?;

        sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Could not read the schema version: {}", e)))
    }

    async fn applied_versions(&self) -> Result<Vec<i64>, DomainError> {
        sqlx::query_scalar("SELECT version FROM _migrations ORDER BY version")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Could not list applied migrations: {}", e))
            })
    }

    async fn apply(&self, migration: &Migration) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Could not open a transaction: {}", e)))?;

        sqlx::raw_sql(migration.up).execute(&mut *tx).await.map_err(|e| {
            DomainError::storage(format!(
                "Migration {} ({}) failed: {}",
                migration.version, migration.description, e
            ))
        })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Could not record the version row: {}", e))
            })?;

        tx.commit().await.map_err(|e| {
            DomainError::storage(format!(
                "Could not commit migration {}: {}",
                migration.version, e
            ))
        })?;

        info!(
            version = migration.version,
            description = migration.description,
            "Applied migration"
        );
        Ok(())
    }

    async fn ensure_version_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::storage(format!("Could not create the _migrations table: {}", e))
        })?;

        Ok(())
    }
}

/// Full schema history for the issuance stores, oldest first
pub const SCHEMA_MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Create api_namespaces table",
        up: r#"
            CREATE TABLE IF NOT EXISTS api_namespaces (
                id VARCHAR(64) PRIMARY KEY,
                workspace_id TEXT NOT NULL,
                name VARCHAR(128) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_api_namespaces_workspace_id
                ON api_namespaces(workspace_id);
        "#,
        down: "DROP TABLE IF EXISTS api_namespaces;",
    },
    Migration {
        version: 2,
        description: "Create root_keys table",
        up: r#"
            CREATE TABLE IF NOT EXISTS root_keys (
                id TEXT PRIMARY KEY,
                hash TEXT NOT NULL UNIQUE,
                workspace_id TEXT NOT NULL,
                permissions JSONB NOT NULL DEFAULT '[]'::jsonb,
                revoked_at TIMESTAMPTZ,
                expires_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
        "#,
        down: "DROP TABLE IF EXISTS root_keys;",
    },
    Migration {
        version: 3,
        description: "Create keys table",
        up: r#"
            CREATE TABLE IF NOT EXISTS keys (
                id VARCHAR(64) PRIMARY KEY,
                hash TEXT NOT NULL UNIQUE,
                start TEXT NOT NULL,
                api_id VARCHAR(64) NOT NULL REFERENCES api_namespaces(id),
                workspace_id TEXT NOT NULL,
                enabled BOOLEAN NOT NULL DEFAULT TRUE,
                owner_id VARCHAR(256),
                meta JSONB,
                expires_at TIMESTAMPTZ,
                remaining BIGINT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_keys_api_id ON keys(api_id);
        "#,
        down: "DROP TABLE IF EXISTS keys;",
    },
    Migration {
        version: 4,
        description: "Create key_ratelimits table",
        up: r#"
            CREATE TABLE IF NOT EXISTS key_ratelimits (
                key_id VARCHAR(64) PRIMARY KEY REFERENCES keys(id) ON DELETE CASCADE,
                kind VARCHAR(16) NOT NULL,
                limit_value BIGINT NOT NULL,
                duration_ms BIGINT NOT NULL
            );
        "#,
        down: "DROP TABLE IF EXISTS key_ratelimits;",
    },
];

/// Brings a fresh or existing database up to the newest schema version
pub async fn migrate_to_latest(pool: &PgPool) -> Result<(), DomainError> {
    let ran = PostgresMigrator::new(pool.clone())
        .apply_pending(SCHEMA_MIGRATIONS)
        .await?;

    if ran > 0 {
        info!(count = ran, "Schema migrations applied");
    }

    Ok(())
}
