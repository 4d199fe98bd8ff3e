use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::constants::{DEFAULT_FETCH_LIMIT, DEFAULT_IDLE_SECS, DEFAULT_SUBREDDIT, MAX_FETCH_LIMIT};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
///
/// Built once at startup and handed by reference to the Reddit client and
/// the database constructor; nothing else reads the environment.
#[derive(Clone)]
pub struct Config {
    // Reddit credentials
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_user_agent: String,
    pub reddit_username: String,
    pub reddit_password: String,

    // Reddit endpoints
    pub reddit_auth_url: String,
    pub reddit_api_url: String,

    // Query
    pub subreddit: String,
    pub fetch_limit: u32,
    pub http_timeout: Duration,

    // Database
    pub database_url: String,

    // Run loop
    pub idle_interval: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("reddit_client_id", &self.reddit_client_id)
            .field("reddit_client_secret", &"<redacted>")
            .field("reddit_user_agent", &self.reddit_user_agent)
            .field("reddit_username", &self.reddit_username)
            .field("reddit_password", &"<redacted>")
            .field("reddit_auth_url", &self.reddit_auth_url)
            .field("reddit_api_url", &self.reddit_api_url)
            .field("subreddit", &self.subreddit)
            .field("fetch_limit", &self.fetch_limit)
            .field("http_timeout", &self.http_timeout)
            .field("database_url", &redact_url(&self.database_url))
            .field("idle_interval", &self.idle_interval)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Reddit credentials
            reddit_client_id: required_env("REDDIT_CLIENT_ID")?,
            reddit_client_secret: required_env("REDDIT_CLIENT_SECRET")?,
            reddit_user_agent: required_env("REDDIT_USER_AGENT")?,
            reddit_username: required_env("REDDIT_USERNAME")?,
            reddit_password: required_env("REDDIT_PASSWORD")?,

            // Reddit endpoints
            reddit_auth_url: env_or_default("REDDIT_AUTH_URL", "https://www.reddit.com"),
            reddit_api_url: env_or_default("REDDIT_API_URL", "https://oauth.reddit.com"),

            // Query
            subreddit: env_or_default("SUBREDDIT", DEFAULT_SUBREDDIT),
            fetch_limit: parse_env_u32("FETCH_LIMIT", DEFAULT_FETCH_LIMIT)?,
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 30)?),

            // Database
            database_url: match optional_env("DATABASE_URL") {
                Some(url) => url,
                None => postgres_url_from_env()?,
            },

            // Run loop
            idle_interval: Duration::from_secs(parse_env_u64("IDLE_SECS", DEFAULT_IDLE_SECS)?),
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("REDDIT_CLIENT_ID", &self.reddit_client_id),
            ("REDDIT_CLIENT_SECRET", &self.reddit_client_secret),
            ("REDDIT_USER_AGENT", &self.reddit_user_agent),
            ("REDDIT_USERNAME", &self.reddit_username),
            ("REDDIT_PASSWORD", &self.reddit_password),
            ("SUBREDDIT", &self.subreddit),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: "cannot be empty".to_string(),
                });
            }
        }
        if self.fetch_limit == 0 || self.fetch_limit > MAX_FETCH_LIMIT {
            return Err(ConfigError::InvalidValue {
                name: "FETCH_LIMIT".to_string(),
                message: format!("must be between 1 and {MAX_FETCH_LIMIT}"),
            });
        }
        for (name, value) in [
            ("REDDIT_AUTH_URL", &self.reddit_auth_url),
            ("REDDIT_API_URL", &self.reddit_api_url),
        ] {
            if let Err(e) = Url::parse(value) {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: e.to_string(),
                });
            }
        }
        if !self.database_url.contains("://") && !self.database_url.starts_with("sqlite:") {
            return Err(ConfigError::InvalidValue {
                name: "DATABASE_URL".to_string(),
                message: "must be a postgres:// or sqlite: URL".to_string(),
            });
        }
        Ok(())
    }

    /// Configuration with placeholder credentials, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            reddit_client_id: "test-client".to_string(),
            reddit_client_secret: "test-secret".to_string(),
            reddit_user_agent: "watchexchange-scraper/test".to_string(),
            reddit_username: "test-user".to_string(),
            reddit_password: "test-password".to_string(),
            reddit_auth_url: "http://127.0.0.1:9".to_string(),
            reddit_api_url: "http://127.0.0.1:9".to_string(),
            subreddit: DEFAULT_SUBREDDIT.to_string(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            http_timeout: Duration::from_secs(5),
            database_url: "sqlite::memory:".to_string(),
            idle_interval: Duration::ZERO,
        }
    }
}

/// Assemble a Postgres URL from the `PG_*` variables.
fn postgres_url_from_env() -> Result<String, ConfigError> {
    let host = env_or_default("PG_HOST", "localhost");
    let database = env_or_default("PG_DATABASE", "postgres");
    let user = env_or_default("PG_USER", "postgres");
    let password = optional_env("PG_PASSWORD");
    build_postgres_url(&host, &database, &user, password.as_deref())
}

fn build_postgres_url(
    host: &str,
    database: &str,
    user: &str,
    password: Option<&str>,
) -> Result<String, ConfigError> {
    let mut url =
        Url::parse(&format!("postgres://{host}")).map_err(|e| ConfigError::InvalidValue {
            name: "PG_HOST".to_string(),
            message: e.to_string(),
        })?;
    let invalid = |name: &str| ConfigError::InvalidValue {
        name: name.to_string(),
        message: "cannot be used in a connection URL".to_string(),
    };
    url.set_username(user).map_err(|()| invalid("PG_USER"))?;
    url.set_password(password).map_err(|()| invalid("PG_PASSWORD"))?;
    url.set_path(&format!("/{database}"));
    Ok(url.into())
}

fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            let _ = url.set_password(Some("<redacted>"));
            url.into()
        }
        _ => raw.to_string(),
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
