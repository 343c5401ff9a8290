//! Configuration for the Twitter client.
//!
//! Credentials are read once from the process environment and never change
//! afterwards. Only the `TWITTER_*` variable names below are recognised.

use std::fmt;

use url::Url;

use crate::error::{Result, TwitterError};

/// Default API root (X API v2).
pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com/2";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Yahoo! Where On Earth id used for trends when none is configured (worldwide).
pub const DEFAULT_TRENDS_WOEID: u32 = 1;

/// Consumer (API) key.
pub const ENV_CONSUMER_KEY: &str = "TWITTER_CONSUMER_KEY";
/// Consumer (API) secret.
pub const ENV_CONSUMER_SECRET: &str = "TWITTER_CONSUMER_SECRET";
/// User access token, usually `<user id>-<token>`.
pub const ENV_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
/// User access token secret.
pub const ENV_ACCESS_TOKEN_SECRET: &str = "TWITTER_ACCESS_TOKEN_SECRET";
/// API root override, mainly for tests and proxies.
pub const ENV_BASE_URL: &str = "TWITTER_API_BASE_URL";
/// Request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "TWITTER_TIMEOUT_SECS";
/// Log mutating calls instead of sending them.
pub const ENV_DRY_RUN: &str = "TWITTER_DRY_RUN";
/// Location used by `get_trending_topics`.
pub const ENV_TRENDS_WOEID: &str = "TWITTER_TRENDS_WOEID";

/// OAuth 1.0a user-context credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Consumer (API) key
    pub consumer_key: String,
    /// Consumer (API) secret
    pub consumer_secret: String,
    /// Access token
    pub access_token: String,
    /// Access token secret
    pub access_token_secret: String,
}

impl Credentials {
    /// Create credentials from the four OAuth 1.0a strings.
    pub fn new(
        consumer_key: &str,
        consumer_secret: &str,
        access_token: &str,
        access_token_secret: &str,
    ) -> Self {
        Self {
            consumer_key: consumer_key.to_string(),
            consumer_secret: consumer_secret.to_string(),
            access_token: access_token.to_string(),
            access_token_secret: access_token_secret.to_string(),
        }
    }

    /// Numeric user id encoded in the access token (`<user_id>-<rest>`), if any.
    pub fn token_user_id(&self) -> Option<&str> {
        let (prefix, rest) = self.access_token.split_once('-')?;
        if prefix.is_empty() || rest.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(prefix)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// Twitter client configuration.
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    /// OAuth credentials
    pub credentials: Credentials,
    /// API root, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Simulate mutating calls instead of sending them
    pub dry_run: bool,
    /// Location used by `get_trending_topics`
    pub trends_woeid: u32,
}

impl TwitterConfig {
    /// Create a new configuration with default settings.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            dry_run: false,
            trends_woeid: DEFAULT_TRENDS_WOEID,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `TWITTER_CONSUMER_KEY`
    /// - `TWITTER_CONSUMER_SECRET`
    /// - `TWITTER_ACCESS_TOKEN`
    /// - `TWITTER_ACCESS_TOKEN_SECRET`
    ///
    /// Optional:
    /// - `TWITTER_API_BASE_URL` (default: `https://api.twitter.com/2`)
    /// - `TWITTER_TIMEOUT_SECS` (default: 30)
    /// - `TWITTER_DRY_RUN` (`true` to simulate mutating calls)
    /// - `TWITTER_TRENDS_WOEID` (default: 1, worldwide)
    ///
    /// # Errors
    ///
    /// Returns [`TwitterError::ConfigError`] naming every missing credential, or
    /// the first optional variable that cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = [
            ENV_CONSUMER_KEY,
            ENV_CONSUMER_SECRET,
            ENV_ACCESS_TOKEN,
            ENV_ACCESS_TOKEN_SECRET,
        ];

        let mut values = Vec::with_capacity(required.len());
        let mut missing = Vec::new();
        for key in required {
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(value) => values.push(value),
                None => missing.push(key),
            }
        }

        if !missing.is_empty() {
            return Err(TwitterError::ConfigError(format!(
                "missing required environment variable(s): {}",
                missing.join(", ")
            )));
        }

        let credentials = Credentials::new(&values[0], &values[1], &values[2], &values[3]);
        let mut config = Self::new(credentials);

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.base_url(&base_url)?;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                TwitterError::ConfigError(format!("{ENV_TIMEOUT_SECS} must be a number of seconds"))
            })?;
        }

        if let Some(dry_run) = lookup(ENV_DRY_RUN) {
            config.dry_run = dry_run.trim().eq_ignore_ascii_case("true");
        }

        if let Some(woeid) = lookup(ENV_TRENDS_WOEID) {
            config.trends_woeid = woeid.trim().parse().map_err(|_| {
                TwitterError::ConfigError(format!("{ENV_TRENDS_WOEID} must be a numeric WOEID"))
            })?;
        }

        Ok(config)
    }

    /// Set the API root. Must be an absolute http(s) URL.
    pub fn base_url(mut self, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url.trim())
            .map_err(|e| TwitterError::ConfigError(format!("invalid API base URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TwitterError::ConfigError(format!(
                "API base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        self.base_url = parsed.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Set the request timeout.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set dry run mode.
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Set the trends location.
    pub fn trends_woeid(mut self, woeid: u32) -> Self {
        self.trends_woeid = woeid;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const FULL: &[(&str, &str)] = &[
        ("TWITTER_CONSUMER_KEY", "ck"),
        ("TWITTER_CONSUMER_SECRET", "cs"),
        ("TWITTER_ACCESS_TOKEN", "42-token"),
        ("TWITTER_ACCESS_TOKEN_SECRET", "ts"),
    ];

    #[test]
    fn test_from_lookup_defaults() {
        let config = TwitterConfig::from_lookup(env(FULL)).unwrap();
        assert_eq!(config.credentials.consumer_key, "ck");
        assert_eq!(config.credentials.access_token_secret, "ts");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.dry_run);
        assert_eq!(config.trends_woeid, 1);
    }

    #[test]
    fn test_from_lookup_reports_all_missing() {
        let err = TwitterConfig::from_lookup(env(&[("TWITTER_CONSUMER_KEY", "ck")])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("TWITTER_CONSUMER_SECRET"));
        assert!(msg.contains("TWITTER_ACCESS_TOKEN"));
        assert!(msg.contains("TWITTER_ACCESS_TOKEN_SECRET"));
        assert!(!msg.contains("TWITTER_CONSUMER_KEY,"));
    }

    #[test]
    fn test_legacy_names_are_ignored() {
        let err = TwitterConfig::from_lookup(env(&[
            ("TW_CONSUMER_KEY", "ck"),
            ("TW_CONSUMER_SECRET", "cs"),
            ("TW_ACCESS_TOKEN", "t"),
            ("TW_ACCESS_TOKEN_SECRET", "ts"),
        ]));
        assert!(err.is_err());
    }

    #[test]
    fn test_optional_settings() {
        let mut pairs = FULL.to_vec();
        pairs.push(("TWITTER_API_BASE_URL", "http://127.0.0.1:9000/2/"));
        pairs.push(("TWITTER_TIMEOUT_SECS", "5"));
        pairs.push(("TWITTER_DRY_RUN", "TRUE"));
        pairs.push(("TWITTER_TRENDS_WOEID", "23424977"));
        let config = TwitterConfig::from_lookup(env(&pairs)).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000/2");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.dry_run);
        assert_eq!(config.trends_woeid, 23424977);
    }

    #[test]
    fn test_bad_optional_settings() {
        let mut pairs = FULL.to_vec();
        pairs.push(("TWITTER_TIMEOUT_SECS", "soon"));
        assert!(TwitterConfig::from_lookup(env(&pairs)).is_err());

        let mut pairs = FULL.to_vec();
        pairs.push(("TWITTER_API_BASE_URL", "ftp://example.com"));
        assert!(TwitterConfig::from_lookup(env(&pairs)).is_err());
    }

    #[test]
    fn test_token_user_id() {
        let creds = Credentials::new("k", "s", "1234567-abcDEF", "ts");
        assert_eq!(creds.token_user_id(), Some("1234567"));
        assert_eq!(Credentials::new("k", "s", "abc-def", "ts").token_user_id(), None);
        assert_eq!(Credentials::new("k", "s", "123456", "ts").token_user_id(), None);
        assert_eq!(Credentials::new("k", "s", "-abc", "ts").token_user_id(), None);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new("visible", "hidden1", "hidden2", "hidden3");
        let out = format!("{creds:?}");
        assert!(out.contains("visible"));
        assert!(!out.contains("hidden"));
    }
}
