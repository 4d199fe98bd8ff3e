use anyhow::{Context, Result};
use sqlx::AnyPool;
use tracing::debug;

/// Run all pending migrations.
///
/// Statements stay within the SQL shared by Postgres and SQLite.
pub async fn run(pool: &AnyPool) -> Result<()> {
    create_migration_table(pool).await?;
    let current_version = get_schema_version(pool).await?;

    if current_version < 1 {
        debug!("Running migration v1");
        run_migration_v1(pool).await?;
        set_schema_version(pool, 1).await?;
    }

    if current_version < 2 {
        debug!("Running migration v2");
        run_migration_v2(pool).await?;
        set_schema_version(pool, 2).await?;
    }

    Ok(())
}

async fn create_migration_table(pool: &AnyPool) -> Result<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS _schema_version (
            version BIGINT PRIMARY KEY
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create schema version table")?;

    Ok(())
}

async fn get_schema_version(pool: &AnyPool) -> Result<i64> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT version FROM _schema_version LIMIT 1")
        .fetch_optional(pool)
        .await
        .context("Failed to get schema version")?;

    Ok(row.map_or(0, |(v,)| v))
}

async fn set_schema_version(pool: &AnyPool, version: i64) -> Result<()> {
    sqlx::query("DELETE FROM _schema_version")
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO _schema_version (version) VALUES ($1)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

async fn run_migration_v1(pool: &AnyPool) -> Result<()> {
    debug!("Running migration v1: creating watchexchange_posts");

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS watchexchange_posts (
            id TEXT PRIMARY KEY,
            created_utc TIMESTAMP NOT NULL,
            username TEXT NOT NULL,
            num_comments BIGINT NOT NULL,
            upvotes BIGINT NOT NULL,
            title TEXT NOT NULL,
            brand TEXT,
            price BIGINT
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create watchexchange_posts table")?;

    Ok(())
}

async fn run_migration_v2(pool: &AnyPool) -> Result<()> {
    debug!("Running migration v2: indexing brand and creation time");

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_watchexchange_posts_created ON watchexchange_posts(created_utc)",
    )
    .execute(pool)
    .await
    .context("Failed to create created_utc index")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_watchexchange_posts_brand ON watchexchange_posts(brand, created_utc)",
    )
    .execute(pool)
    .await
    .context("Failed to create brand index")?;

    Ok(())
}
