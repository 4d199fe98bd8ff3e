//! Today's posts from the forum, normalized into [`Post`] records.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use tracing::{debug, info};

use crate::constants::UNKNOWN_AUTHOR;
use crate::db::Post;
use crate::reddit::{PostSource, Submission};

/// Midnight UTC of the day containing `now`.
#[must_use]
pub fn start_of_utc_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Fetch the newest `limit` posts of `community` and keep those created
/// since midnight UTC of `now`.
///
/// Only the newest `limit` posts are ever inspected, so on a busy day the
/// earliest posts are missed.
///
/// # Errors
///
/// Any source failure or malformed submission fails the whole fetch.
pub async fn fetch_today_posts(
    source: &dyn PostSource,
    community: &str,
    limit: u32,
    now: DateTime<Utc>,
) -> Result<Vec<Post>> {
    let submissions = source
        .newest_posts(community, limit)
        .await
        .with_context(|| format!("Failed to fetch newest posts from r/{community}"))?;

    let boundary = start_of_utc_day(now);
    let fetched = submissions.len();
    let posts = posts_since(submissions, boundary)?;

    info!(
        community,
        fetched,
        today = posts.len(),
        since = %boundary,
        "Fetched posts"
    );
    Ok(posts)
}

/// Normalize the submissions created at or after `boundary`, keeping order.
///
/// # Errors
///
/// Returns an error if a submission carries an unusable timestamp.
pub fn posts_since(
    submissions: impl IntoIterator<Item = Submission>,
    boundary: DateTime<Utc>,
) -> Result<Vec<Post>> {
    let mut posts = Vec::new();
    for submission in submissions {
        let post = normalize(submission)?;
        if post.created_utc >= boundary {
            posts.push(post);
        } else {
            debug!(id = %post.id, created_utc = %post.created_utc, "Skipping post from before today");
        }
    }
    Ok(posts)
}

/// Turn a raw submission into a [`Post`] without brand or price.
///
/// # Errors
///
/// Returns an error if `created_utc` is not a usable timestamp.
pub fn normalize(submission: Submission) -> Result<Post> {
    let created_utc = submission.created_at().with_context(|| {
        format!(
            "Post {} has invalid created_utc {}",
            submission.id, submission.created_utc
        )
    })?;
    let username = submission
        .author_name()
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string();

    Ok(Post {
        id: submission.id,
        created_utc,
        username,
        num_comments: submission.num_comments,
        upvotes: submission.score,
        title: submission.title,
        brand: None,
        price: None,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn submission(id: &str, created: DateTime<Utc>) -> Submission {
        Submission {
            id: id.to_string(),
            author: Some("seller".to_string()),
            title: format!("[WTS] watch {id}"),
            score: 3,
            num_comments: 2,
            created_utc: created.timestamp() as f64,
        }
    }

    #[test]
    fn test_start_of_utc_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 17, 4, 55).unwrap();
        assert_eq!(
            start_of_utc_day(now),
            Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap()
        );

        let midnight = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap();
        assert_eq!(start_of_utc_day(midnight), midnight);
    }

    #[test]
    fn test_posts_since_boundary_is_inclusive() {
        let boundary = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap();
        let posts = posts_since(
            vec![
                submission("c", boundary + chrono::Duration::hours(5)),
                submission("b", boundary),
                submission("a", boundary - chrono::Duration::seconds(1)),
            ],
            boundary,
        )
        .unwrap();

        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["c", "b"]);
        assert!(posts.iter().all(|p| p.created_utc >= boundary));
    }

    #[test]
    fn test_posts_since_fractional_seconds_before_midnight() {
        let boundary = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap();
        let mut late = submission("late", boundary);
        late.created_utc = boundary.timestamp() as f64 - 0.25;
        assert!(posts_since(vec![late], boundary).unwrap().is_empty());
    }

    #[test]
    fn test_normalize_maps_fields() {
        let created = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let post = normalize(Submission {
            score: -2,
            ..submission("x1", created)
        })
        .unwrap();

        assert_eq!(post.id, "x1");
        assert_eq!(post.created_utc, created);
        assert_eq!(post.username, "seller");
        assert_eq!(post.num_comments, 2);
        assert_eq!(post.upvotes, -2);
        assert_eq!(post.title, "[WTS] watch x1");
        assert_eq!(post.brand, None);
        assert_eq!(post.price, None);
    }

    #[test]
    fn test_normalize_deleted_author() {
        let created = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        for author in [None, Some("[deleted]".to_string()), Some(String::new())] {
            let post = normalize(Submission {
                author,
                ..submission("x2", created)
            })
            .unwrap();
            assert_eq!(post.username, UNKNOWN_AUTHOR);
        }
    }

    #[test]
    fn test_normalize_rejects_bad_timestamp() {
        let created = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let bad = Submission {
            created_utc: f64::INFINITY,
            ..submission("x3", created)
        };
        assert!(normalize(bad).is_err());
    }
}
