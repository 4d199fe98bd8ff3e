use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::models::{Listing, Submission, TokenResponse};
use super::PostSource;
use crate::config::Config;

const LISTING_ENDPOINT: &str = "subreddit listing";

#[derive(Debug, Error)]
pub enum RedditError {
    #[error("invalid Reddit endpoint URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("request to Reddit failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Bearer token for the OAuth API.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Reddit API client using the password grant of a "script" app.
pub struct RedditClient {
    http: reqwest::Client,
    auth_url: Url,
    api_url: Url,
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
}

impl RedditClient {
    /// Build a client from the Reddit section of `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &Config) -> Result<Self, RedditError> {
        let http = reqwest::Client::builder()
            .user_agent(config.reddit_user_agent.clone())
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            http,
            auth_url: base_url(&config.reddit_auth_url)?,
            api_url: base_url(&config.reddit_api_url)?,
            client_id: config.reddit_client_id.clone(),
            client_secret: config.reddit_client_secret.clone(),
            username: config.reddit_username.clone(),
            password: config.reddit_password.clone(),
        })
    }

    /// Exchange the account credentials for an access token.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status, or a
    /// response without a token.
    pub async fn authenticate(&self) -> Result<AccessToken, RedditError> {
        const ENDPOINT: &str = "access_token";

        let url = self.auth_url.join("api/v1/access_token")?;
        let response = self
            .http
            .post(url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "password"),
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await?;

        let body = read_body(ENDPOINT, response).await?;
        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|source| RedditError::Decode {
                endpoint: ENDPOINT,
                source,
            })?;

        if let Some(error) = token.error {
            return Err(RedditError::Auth(error));
        }
        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RedditError::Auth("no access_token in response".to_string()))?;

        debug!(
            token_type = token.token_type.as_deref().unwrap_or("unknown"),
            expires_in = ?token.expires_in,
            "Obtained Reddit access token"
        );
        Ok(AccessToken(access_token))
    }

    /// Fetch the newest `limit` submissions of `subreddit`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status, or a body
    /// that is not a listing.
    pub async fn new_posts(
        &self,
        token: &AccessToken,
        subreddit: &str,
        limit: u32,
    ) -> Result<Listing, RedditError> {
        let mut url = self.api_url.join(&format!("r/{subreddit}/new"))?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("raw_json", "1");

        let response = self
            .http
            .get(url)
            .bearer_auth(token.as_str())
            .send()
            .await?;

        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
        {
            debug!(remaining, "Reddit rate limit");
        }

        let body = read_body(LISTING_ENDPOINT, response).await?;
        serde_json::from_str(&body).map_err(|source| RedditError::Decode {
            endpoint: LISTING_ENDPOINT,
            source,
        })
    }
}

#[async_trait]
impl PostSource for RedditClient {
    async fn newest_posts(&self, community: &str, limit: u32) -> Result<Vec<Submission>> {
        let token = self.authenticate().await?;
        let listing = self.new_posts(&token, community, limit).await?;
        let submissions = listing
            .into_submissions()
            .map_err(|source| RedditError::Decode {
                endpoint: LISTING_ENDPOINT,
                source,
            })?;
        Ok(submissions)
    }
}

/// Read the body, turning non-success statuses into errors.
async fn read_body(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<String, RedditError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(RedditError::Status {
            endpoint,
            status,
            body: truncate(&body, 200).to_string(),
        });
    }
    Ok(body)
}

/// Parse `raw` so that relative joins append to its path.
fn base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
