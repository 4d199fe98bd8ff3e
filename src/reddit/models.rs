use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author value Reddit reports for removed accounts.
const DELETED_AUTHOR: &str = "[deleted]";

const SUBMISSION_KIND: &str = "t3";

/// Envelope around every listing response (`{"kind": "Listing", "data": {...}}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub kind: String,
    pub data: ListingData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingData {
    pub children: Vec<Thing>,
}

/// A listing entry; `kind` is `t3` for submissions.
///
/// `data` stays raw until the kind is known, since other kinds carry
/// unrelated fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thing {
    pub kind: String,
    pub data: serde_json::Value,
}

/// The subset of a Reddit submission the scraper keeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    #[serde(default)]
    pub author: Option<String>,
    pub title: String,
    pub score: i64,
    pub num_comments: i64,
    /// Seconds since the Unix epoch, as a float.
    pub created_utc: f64,
}

impl Submission {
    /// Author name, or `None` for deleted or missing accounts.
    #[must_use]
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_deref()
            .filter(|name| !name.is_empty() && *name != DELETED_AUTHOR)
    }

    /// Creation time truncated to whole seconds.
    ///
    /// `None` if the timestamp is not finite or out of range.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        if !self.created_utc.is_finite() {
            return None;
        }
        DateTime::from_timestamp(self.created_utc.floor() as i64, 0)
    }
}

impl Listing {
    /// Submissions in the order Reddit returned them (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if a `t3` entry lacks a submission field.
    pub fn into_submissions(self) -> Result<Vec<Submission>, serde_json::Error> {
        self.data
            .children
            .into_iter()
            .filter(|thing| thing.kind == SUBMISSION_KIND)
            .map(|thing| serde_json::from_value(thing.data))
            .collect()
    }
}

/// Response from the OAuth token endpoint.
///
/// Reddit answers bad credentials with `200 OK` and an `error` field, so
/// both shapes share one struct.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub error: Option<String>,
}
