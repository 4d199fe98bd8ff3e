//! Reddit as the source of forum posts.

mod client;
mod models;

pub use client::{AccessToken, RedditClient, RedditError};
pub use models::{Listing, ListingData, Submission, Thing, TokenResponse};

use anyhow::Result;
use async_trait::async_trait;

/// A forum that can list its newest posts.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// The newest `limit` posts of `community`, newest first.
    async fn newest_posts(&self, community: &str, limit: u32) -> Result<Vec<Submission>>;
}
