//! One fetch → enrich → save cycle.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::Config;
use crate::db::{save_posts, Database, Post, SaveSummary};
use crate::fetcher::fetch_today_posts;
use crate::parser::TitleParser;
use crate::reddit::PostSource;

/// What a single run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched: usize,
    pub with_brand: usize,
    pub with_price: usize,
    pub saved: SaveSummary,
}

/// Run one cycle against the current time.
///
/// # Errors
///
/// Returns an error if fetching or saving fails; nothing is retried.
pub async fn run_once(
    config: &Config,
    source: &dyn PostSource,
    parser: &TitleParser,
) -> Result<RunSummary> {
    run_once_at(config, source, parser, Utc::now()).await
}

/// Run one cycle as if the current time were `now`.
///
/// The database at `config.database_url` is opened only after the fetch,
/// and only when there is something to save.
///
/// # Errors
///
/// Returns an error if fetching or saving fails; nothing is retried.
pub async fn run_once_at(
    config: &Config,
    source: &dyn PostSource,
    parser: &TitleParser,
    now: DateTime<Utc>,
) -> Result<RunSummary> {
    let mut posts = fetch_today_posts(source, &config.subreddit, config.fetch_limit, now).await?;

    for post in &mut posts {
        post.enrich(parser);
    }

    let mut summary = RunSummary {
        fetched: posts.len(),
        with_brand: posts.iter().filter(|p| p.brand.is_some()).count(),
        with_price: posts.iter().filter(|p| p.price.is_some()).count(),
        saved: SaveSummary::default(),
    };

    if posts.is_empty() {
        info!("No posts yet today, nothing to save");
        return Ok(summary);
    }

    summary.saved = save(&config.database_url, &posts).await?;

    info!(
        fetched = summary.fetched,
        with_brand = summary.with_brand,
        with_price = summary.with_price,
        inserted = summary.saved.inserted,
        skipped = summary.saved.skipped,
        "Run complete"
    );
    Ok(summary)
}

/// Open the store, write the batch, and close the connection again.
async fn save(database_url: &str, posts: &[Post]) -> Result<SaveSummary> {
    let db = Database::connect(database_url)
        .await
        .context("Failed to open database")?;
    let result = save_posts(&db, posts).await;
    db.close().await;
    result.context("Failed to save posts")
}
