//! Shared constants used across the application.

/// Community whose newest posts are scraped.
pub const DEFAULT_SUBREDDIT: &str = "watchexchange";

/// How many of the newest posts are inspected per run.
///
/// Reddit caps a single listing page at 100 entries; if more than this many
/// posts were made since midnight UTC, the older ones are never seen.
pub const DEFAULT_FETCH_LIMIT: u32 = 100;

/// Largest `limit` the Reddit listing endpoint honours.
pub const MAX_FETCH_LIMIT: u32 = 100;

/// Stored in place of the author name when the account is deleted or hidden.
pub const UNKNOWN_AUTHOR: &str = "N/A";

/// Seconds to idle after a run before the process exits.
pub const DEFAULT_IDLE_SECS: u64 = 300;

/// Format of `created_utc` as written to the store.
pub const CREATED_UTC_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
