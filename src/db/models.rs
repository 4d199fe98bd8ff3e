use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::CREATED_UTC_FORMAT;
use crate::parser::TitleParser;

/// A watchexchange post, as stored in `watchexchange_posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub created_utc: DateTime<Utc>,
    pub username: String,
    pub num_comments: i64,
    pub upvotes: i64,
    pub title: String,
    pub brand: Option<String>,
    pub price: Option<i64>,
}

impl Post {
    /// Fill `brand` and `price` from the title. Other fields are untouched.
    pub fn enrich(&mut self, parser: &TitleParser) {
        let extraction = parser.extract(&self.title);
        self.brand = extraction.brand;
        self.price = extraction.price;
    }

    /// `created_utc` in the stored text form, e.g. `2024-03-09 17:04:55`.
    #[must_use]
    pub fn created_utc_string(&self) -> String {
        self.created_utc.format(CREATED_UTC_FORMAT).to_string()
    }
}

/// Outcome of saving a batch of posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    /// Rows newly written.
    pub inserted: u64,
    /// Posts whose id was already stored and were left untouched.
    pub skipped: u64,
}
