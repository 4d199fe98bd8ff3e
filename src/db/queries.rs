use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::debug;

use super::{Backend, Database, Post, SaveSummary};
use crate::constants::CREATED_UTC_FORMAT;

const INSERT_POST_POSTGRES: &str = r"
    INSERT INTO watchexchange_posts (id, created_utc, username, num_comments, upvotes, title, brand, price)
    VALUES ($1, CAST($2 AS TIMESTAMP), $3, $4, $5, $6, $7, $8)
    ON CONFLICT (id) DO NOTHING
";

// SQLite keeps the timestamp as text; its CAST to TIMESTAMP would yield a number.
const INSERT_POST_SQLITE: &str = r"
    INSERT INTO watchexchange_posts (id, created_utc, username, num_comments, upvotes, title, brand, price)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    ON CONFLICT (id) DO NOTHING
";

const SELECT_POST: &str = r"
    SELECT id, CAST(created_utc AS TEXT) AS created_utc, username, num_comments, upvotes, title, brand, price
    FROM watchexchange_posts
";

const fn insert_post_sql(backend: Backend) -> &'static str {
    match backend {
        Backend::Postgres => INSERT_POST_POSTGRES,
        Backend::Sqlite => INSERT_POST_SQLITE,
    }
}

/// Insert every post whose id is not yet stored, in a single transaction.
///
/// Existing rows are never modified. Any failure rolls back the whole batch.
pub async fn save_posts(db: &Database, posts: &[Post]) -> Result<SaveSummary> {
    let sql = insert_post_sql(db.backend());

    // Dropping the transaction on an early return rolls it back and hands the
    // connection back to the pool.
    let mut tx = db
        .pool()
        .begin()
        .await
        .context("Failed to begin transaction")?;

    let mut summary = SaveSummary::default();
    for post in posts {
        let result = sqlx::query(sql)
            .bind(&post.id)
            .bind(post.created_utc_string())
            .bind(&post.username)
            .bind(post.num_comments)
            .bind(post.upvotes)
            .bind(&post.title)
            .bind(&post.brand)
            .bind(post.price)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert post {}", post.id))?;

        if result.rows_affected() > 0 {
            summary.inserted += 1;
        } else {
            debug!(id = %post.id, "Post already stored");
            summary.skipped += 1;
        }
    }

    tx.commit().await.context("Failed to commit posts")?;

    Ok(summary)
}

/// Look up a stored post by id.
pub async fn get_post(db: &Database, id: &str) -> Result<Option<Post>> {
    let sql = format!("{SELECT_POST} WHERE id = $1");
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(db.pool())
        .await
        .context("Failed to get post")?;

    row.as_ref().map(post_from_row).transpose()
}

/// All stored posts, newest first.
pub async fn get_all_posts(db: &Database) -> Result<Vec<Post>> {
    let sql = format!("{SELECT_POST} ORDER BY created_utc DESC, id");
    let rows = sqlx::query(&sql)
        .fetch_all(db.pool())
        .await
        .context("Failed to list posts")?;

    rows.iter().map(post_from_row).collect()
}

/// Number of stored posts.
pub async fn count_posts(db: &Database) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM watchexchange_posts")
        .fetch_one(db.pool())
        .await
        .context("Failed to count posts")?;
    Ok(count)
}

fn post_from_row(row: &AnyRow) -> Result<Post> {
    let created: String = row.try_get("created_utc")?;
    let created_utc = NaiveDateTime::parse_from_str(&created, CREATED_UTC_FORMAT)
        .with_context(|| format!("Unexpected created_utc value '{created}'"))?
        .and_utc();

    Ok(Post {
        id: row.try_get("id")?,
        created_utc,
        username: row.try_get("username")?,
        num_comments: row.try_get("num_comments")?,
        upvotes: row.try_get("upvotes")?,
        title: row.try_get("title")?,
        brand: row.try_get("brand")?,
        price: row.try_get("price")?,
    })
}
