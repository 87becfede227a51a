//! Schema definitions and migration utilities.
//!
//! The schema ships embedded in the binary and is applied idempotently
//! at startup; there is no external migration tooling to run.

use sqlx::PgPool;

use crate::error::{StoreError, StoreResult};

/// Embedded migration SQL for the core schema (001_schema.sql).
pub const SCHEMA_MIGRATION: &str = include_str!("../../../migrations/001_schema.sql");

/// Run all pending migrations against the database.
///
/// This function is idempotent - it can be run multiple times safely.
/// Migrations check for existing objects before creating them.
///
/// # Errors
///
/// Returns an error if the migration fails to execute.
pub async fn run_migrations(pool: &PgPool) -> StoreResult<()> {
    tracing::info!("Running database migrations...");

    sqlx::raw_sql(SCHEMA_MIGRATION)
        .execute(pool)
        .await
        .map_err(|e| StoreError::Migration(format!("Schema migration failed: {}", e)))?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}

/// Check if the schema has been initialized.
///
/// Returns true if the `documents` table exists.
pub async fn is_schema_initialized(pool: &PgPool) -> StoreResult<bool> {
    let result: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = 'documents'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(result.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_migration_embedded() {
        // Verify the migration SQL is properly embedded
        assert!(SCHEMA_MIGRATION.contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(SCHEMA_MIGRATION.contains("CREATE TABLE IF NOT EXISTS documents"));
        assert!(SCHEMA_MIGRATION.contains("CREATE TABLE IF NOT EXISTS document_versions"));
        assert!(SCHEMA_MIGRATION.contains("CREATE TABLE IF NOT EXISTS shares"));
        assert!(SCHEMA_MIGRATION.contains("CREATE TABLE IF NOT EXISTS comments"));
    }

    #[test]
    fn test_version_numbering_is_constraint_backed() {
        assert!(SCHEMA_MIGRATION.contains("UNIQUE (document_id, version_number)"));
    }

    #[test]
    fn test_versions_cascade_from_documents() {
        assert!(SCHEMA_MIGRATION.contains("REFERENCES documents(id) ON DELETE CASCADE"));
    }
}
