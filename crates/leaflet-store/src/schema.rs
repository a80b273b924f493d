//! Schema definitions and migration utilities.
//!
//! The schema is embedded at compile time and applied on connect. Every
//! statement is `IF NOT EXISTS`, so running it against an initialized
//! database is a no-op.

use sqlx::PgPool;

use crate::error::{StoreError, StoreResult};

/// Embedded migration SQL for the document tables (001_documents.sql).
pub const DOCUMENTS_MIGRATION: &str = include_str!("../../../migrations/001_documents.sql");

/// Tables the store expects to exist.
pub const COLLECTIONS: [&str; 3] = ["users", "workspaces", "pages"];

/// Run all pending migrations against the database.
pub async fn run_migrations(pool: &PgPool) -> StoreResult<()> {
    tracing::info!("Running database migrations...");

    tracing::debug!("Running documents migration (001_documents.sql)...");
    sqlx::raw_sql(DOCUMENTS_MIGRATION)
        .execute(pool)
        .await
        .map_err(|e| StoreError::MigrationError(format!("Documents migration failed: {}", e)))?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}

/// Check if the schema has been initialized.
///
/// Returns true only when every collection table exists.
pub async fn is_schema_initialized(pool: &PgPool) -> StoreResult<bool> {
    let result: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)::bigint
        FROM information_schema.tables
        WHERE table_schema = 'public'
        AND table_name = ANY($1)
        "#,
    )
    .bind(COLLECTIONS.iter().map(|t| t.to_string()).collect::<Vec<_>>())
    .fetch_one(pool)
    .await?;

    Ok(result.0 == COLLECTIONS.len() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_migration_embedded() {
        for table in COLLECTIONS {
            assert!(
                DOCUMENTS_MIGRATION.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
                "missing table {table}"
            );
        }
    }

    #[test]
    fn test_documents_migration_is_idempotent() {
        let creates = DOCUMENTS_MIGRATION.matches("CREATE ").count();
        let guarded = DOCUMENTS_MIGRATION.matches("IF NOT EXISTS").count();
        assert_eq!(creates, guarded);
    }

    #[test]
    fn test_email_is_unique() {
        assert!(DOCUMENTS_MIGRATION.contains("CREATE UNIQUE INDEX IF NOT EXISTS users_email_key"));
    }
}
