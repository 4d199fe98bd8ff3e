//! watchexchange scraper library.
//!
//! Fetches today's r/watchexchange posts, parses a brand and asking price out
//! of each title, and records the posts in `watchexchange_posts` without
//! touching rows that are already there.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod brands;
pub mod config;
pub mod constants;
pub mod db;
pub mod fetcher;
pub mod parser;
pub mod pipeline;
pub mod reddit;
