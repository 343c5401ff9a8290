//! X (Twitter) API v2 Client
//!
//! Async HTTP client for the X API v2 endpoints the command catalog wraps,
//! signed with OAuth 1.0a user-context credentials.

use chrono::{DateTime, Utc};
use reqwest::{header::AUTHORIZATION, Client, Method, Response};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::auth;
use crate::config::TwitterConfig;
use crate::error::{Result, TwitterError};
use crate::types::*;

const TWEET_FIELDS: &str = "id,text,created_at,author_id,referenced_tweets";
const USER_FIELDS: &str = "id,name,username,public_metrics";
const TWEET_EXPANSIONS: &str = "author_id,referenced_tweets.id";

type Query = Vec<(&'static str, String)>;

/// X (Twitter) API v2 client.
///
/// Holds no mutable state; one instance can be shared across concurrent
/// command invocations behind an `Arc`.
#[derive(Debug)]
pub struct XClient {
    client: Client,
    config: TwitterConfig,
}

impl XClient {
    /// Create a new X client.
    pub fn new(config: TwitterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Client configuration.
    pub fn config(&self) -> &TwitterConfig {
        &self.config
    }

    /// Whether mutating calls are simulated.
    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.url(endpoint);
        let params: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();

        let authorization =
            auth::authorization_header(&self.config.credentials, method.as_str(), &url, &params)?;

        let full_url = if params.is_empty() {
            url
        } else {
            let qs = params
                .iter()
                .map(|(k, v)| format!("{}={}", auth::percent_encode(k), auth::percent_encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            format!("{url}?{qs}")
        };

        debug!("{} {}", method, full_url);

        let mut request = self
            .client
            .request(method, &full_url)
            .header(AUTHORIZATION, authorization);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let response = self.check_response(response).await?;
        let text = response.text().await?;

        if text.trim().is_empty() {
            return Err(TwitterError::EmptyResponse);
        }

        serde_json::from_str(&text).map_err(|e| TwitterError::ParseError(e.to_string()))
    }

    async fn check_response(&self, response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();

        if status == 429 {
            let reset_at = response
                .headers()
                .get("x-rate-limit-reset")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(TwitterError::RateLimited { reset_at });
        }

        let text = response.text().await?;

        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| api_error_message(&v))
            .unwrap_or(text);

        Err(TwitterError::ApiError { status, message })
    }

    /// `data` of a single-object response, turning a body-level `errors` array
    /// into an [`TwitterError::ApiError`].
    fn single_data(response: &Value) -> Result<&Value> {
        let data = &response["data"];
        if data.is_null() {
            return Err(match api_error_message(response) {
                Some(message) => TwitterError::ApiError {
                    status: 200,
                    message,
                },
                None => TwitterError::EmptyResponse,
            });
        }
        Ok(data)
    }

    // =========================================================================
    // User Methods
    // =========================================================================

    /// ID of the authenticated user.
    ///
    /// Taken from the access token when it carries the user id prefix,
    /// otherwise looked up with `GET /users/me`.
    pub async fn authenticated_user_id(&self) -> Result<String> {
        if let Some(id) = self.config.credentials.token_user_id() {
            return Ok(id.to_string());
        }
        Ok(self.me().await?.id)
    }

    /// Get the authenticated user's profile.
    pub async fn me(&self) -> Result<Profile> {
        let query: Query = vec![("user.fields", USER_FIELDS.to_string())];
        let data = self.request(Method::GET, "/users/me", &query, None).await?;
        parse_profile(Self::single_data(&data)?)
    }

    /// Get a user's profile by username.
    pub async fn get_profile(&self, username: &str) -> Result<Profile> {
        let query: Query = vec![("user.fields", USER_FIELDS.to_string())];
        let endpoint = format!("/users/by/username/{}", auth::percent_encode(username));
        let data = self.request(Method::GET, &endpoint, &query, None).await?;
        parse_profile(Self::single_data(&data)?)
    }

    /// Get a user's profile by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Profile> {
        let query: Query = vec![("user.fields", USER_FIELDS.to_string())];
        let data = self
            .request(Method::GET, &format!("/users/{user_id}"), &query, None)
            .await?;
        parse_profile(Self::single_data(&data)?)
    }

    /// Search users by keyword.
    pub async fn search_users(&self, query: &str, max_results: u32) -> Result<ProfilePage> {
        let params: Query = vec![
            ("query", query.to_string()),
            ("max_results", max_results.clamp(1, 1000).to_string()),
            ("user.fields", USER_FIELDS.to_string()),
        ];
        let data = self
            .request(Method::GET, "/users/search", &params, None)
            .await?;
        Ok(parse_profile_page(&data))
    }

    /// Get users blocked by `user_id`.
    pub async fn get_blocking(&self, user_id: &str, max_results: u32) -> Result<ProfilePage> {
        let query: Query = vec![
            ("max_results", max_results.clamp(1, 1000).to_string()),
            ("user.fields", USER_FIELDS.to_string()),
        ];
        let data = self
            .request(Method::GET, &format!("/users/{user_id}/blocking"), &query, None)
            .await?;
        Ok(parse_profile_page(&data))
    }

    /// Get users who retweeted a tweet.
    pub async fn get_retweeters(&self, tweet_id: &str, max_results: u32) -> Result<ProfilePage> {
        let query: Query = vec![
            ("max_results", max_results.clamp(1, 100).to_string()),
            ("user.fields", USER_FIELDS.to_string()),
        ];
        let data = self
            .request(Method::GET, &format!("/tweets/{tweet_id}/retweeted_by"), &query, None)
            .await?;
        Ok(parse_profile_page(&data))
    }

    /// Follow a user.
    pub async fn follow_user(&self, user_id: &str) -> Result<FollowState> {
        if self.config.dry_run {
            debug!("Dry run: would follow user: {}", user_id);
            return Ok(FollowState::Following);
        }

        let me = self.authenticated_user_id().await?;
        let body = serde_json::json!({ "target_user_id": user_id });
        let data = self
            .request(Method::POST, &format!("/users/{me}/following"), &[], Some(&body))
            .await?;

        let state = if data["data"]["following"].as_bool().unwrap_or(false) {
            FollowState::Following
        } else if data["data"]["pending_follow"].as_bool().unwrap_or(false) {
            FollowState::Pending
        } else {
            FollowState::NotFollowing
        };
        Ok(state)
    }

    /// Unfollow a user.
    pub async fn unfollow_user(&self, user_id: &str) -> Result<bool> {
        if self.config.dry_run {
            debug!("Dry run: would unfollow user: {}", user_id);
            return Ok(true);
        }

        let me = self.authenticated_user_id().await?;
        let data = self
            .request(Method::DELETE, &format!("/users/{me}/following/{user_id}"), &[], None)
            .await?;

        Ok(!data["data"]["following"].as_bool().unwrap_or(true))
    }

    // =========================================================================
    // Tweet Methods
    // =========================================================================

    /// Create a tweet, optionally as a reply.
    pub async fn create_tweet(&self, text: &str, reply_to: Option<&str>) -> Result<TweetCreateResult> {
        if self.config.dry_run {
            debug!("Dry run: would post (reply to {:?}): {}", reply_to, text);
            return Ok(TweetCreateResult {
                id: "dry-run".to_string(),
                text: text.to_string(),
            });
        }

        let body = match reply_to {
            Some(id) => serde_json::json!({
                "text": text,
                "reply": { "in_reply_to_tweet_id": id }
            }),
            None => serde_json::json!({ "text": text }),
        };

        let data = self.request(Method::POST, "/tweets", &[], Some(&body)).await?;
        let created = Self::single_data(&data)?;

        Ok(TweetCreateResult {
            id: created["id"]
                .as_str()
                .ok_or_else(|| TwitterError::ParseError("Missing tweet id".to_string()))?
                .to_string(),
            text: created["text"].as_str().unwrap_or(text).to_string(),
        })
    }

    /// Like a tweet.
    pub async fn like_tweet(&self, tweet_id: &str) -> Result<bool> {
        if self.config.dry_run {
            debug!("Dry run: would like tweet: {}", tweet_id);
            return Ok(true);
        }

        let me = self.authenticated_user_id().await?;
        let body = serde_json::json!({ "tweet_id": tweet_id });
        let data = self
            .request(Method::POST, &format!("/users/{me}/likes"), &[], Some(&body))
            .await?;

        Ok(data["data"]["liked"].as_bool().unwrap_or(false))
    }

    /// Unlike a tweet.
    pub async fn unlike_tweet(&self, tweet_id: &str) -> Result<bool> {
        if self.config.dry_run {
            debug!("Dry run: would unlike tweet: {}", tweet_id);
            return Ok(true);
        }

        let me = self.authenticated_user_id().await?;
        let data = self
            .request(Method::DELETE, &format!("/users/{me}/likes/{tweet_id}"), &[], None)
            .await?;

        Ok(!data["data"]["liked"].as_bool().unwrap_or(true))
    }

    /// Retweet a tweet.
    pub async fn retweet(&self, tweet_id: &str) -> Result<bool> {
        if self.config.dry_run {
            debug!("Dry run: would retweet: {}", tweet_id);
            return Ok(true);
        }

        let me = self.authenticated_user_id().await?;
        let body = serde_json::json!({ "tweet_id": tweet_id });
        let data = self
            .request(Method::POST, &format!("/users/{me}/retweets"), &[], Some(&body))
            .await?;

        Ok(data["data"]["retweeted"].as_bool().unwrap_or(false))
    }

    /// Undo a retweet.
    pub async fn unretweet(&self, tweet_id: &str) -> Result<bool> {
        if self.config.dry_run {
            debug!("Dry run: would unretweet: {}", tweet_id);
            return Ok(true);
        }

        let me = self.authenticated_user_id().await?;
        let data = self
            .request(Method::DELETE, &format!("/users/{me}/retweets/{tweet_id}"), &[], None)
            .await?;

        Ok(!data["data"]["retweeted"].as_bool().unwrap_or(true))
    }

    // =========================================================================
    // Direct Messages
    // =========================================================================

    /// Send a direct message to a user.
    pub async fn send_direct_message(&self, user_id: &str, text: &str) -> Result<DirectMessageResult> {
        if self.config.dry_run {
            debug!("Dry run: would message {}: {}", user_id, text);
            return Ok(DirectMessageResult {
                event_id: "dry-run".to_string(),
            });
        }

        let body = serde_json::json!({ "text": text });
        let data = self
            .request(
                Method::POST,
                &format!("/dm_conversations/with/{user_id}/messages"),
                &[],
                Some(&body),
            )
            .await?;
        let created = Self::single_data(&data)?;

        Ok(DirectMessageResult {
            event_id: created["dm_event_id"]
                .as_str()
                .ok_or_else(|| TwitterError::ParseError("Missing DM event id".to_string()))?
                .to_string(),
        })
    }

    // =========================================================================
    // Timeline Methods
    // =========================================================================

    fn timeline_query(max_results: u32, min: u32, pagination_token: Option<&str>) -> Query {
        let mut query: Query = vec![
            ("max_results", max_results.clamp(min, 100).to_string()),
            ("tweet.fields", TWEET_FIELDS.to_string()),
            ("user.fields", "id,name,username".to_string()),
            ("expansions", TWEET_EXPANSIONS.to_string()),
        ];
        if let Some(token) = pagination_token {
            query.push(("pagination_token", token.to_string()));
        }
        query
    }

    /// Get tweets mentioning a user, newest first.
    pub async fn get_mentions(
        &self,
        user_id: &str,
        max_results: u32,
        pagination_token: Option<&str>,
    ) -> Result<TweetPage> {
        let query = Self::timeline_query(max_results, 5, pagination_token);
        let data = self
            .request(Method::GET, &format!("/users/{user_id}/mentions"), &query, None)
            .await?;
        Ok(parse_tweet_page(&data))
    }

    /// Get a user's tweets, newest first.
    pub async fn get_user_tweets(
        &self,
        user_id: &str,
        max_results: u32,
        pagination_token: Option<&str>,
    ) -> Result<TweetPage> {
        let query = Self::timeline_query(max_results, 5, pagination_token);
        let data = self
            .request(Method::GET, &format!("/users/{user_id}/tweets"), &query, None)
            .await?;
        Ok(parse_tweet_page(&data))
    }

    /// Get tweets liked by a user.
    pub async fn get_liked_tweets(&self, user_id: &str, max_results: u32) -> Result<TweetPage> {
        let query = Self::timeline_query(max_results, 5, None);
        let data = self
            .request(Method::GET, &format!("/users/{user_id}/liked_tweets"), &query, None)
            .await?;
        Ok(parse_tweet_page(&data))
    }

    // =========================================================================
    // Search and Trends
    // =========================================================================

    /// Search tweets from the last seven days.
    pub async fn search_recent(&self, query: &str, max_results: u32) -> Result<TweetPage> {
        let mut params: Query = vec![("query", query.to_string())];
        params.extend(Self::timeline_query(max_results, 10, None));
        let data = self
            .request(Method::GET, "/tweets/search/recent", &params, None)
            .await?;
        Ok(parse_tweet_page(&data))
    }

    /// Trending topics for a location.
    pub async fn get_trends(&self, woeid: u32) -> Result<Vec<Trend>> {
        let data = self
            .request(Method::GET, &format!("/trends/by/woeid/{woeid}"), &[], None)
            .await?;

        if data["data"].is_null() {
            if let Some(message) = api_error_message(&data) {
                return Err(TwitterError::ApiError {
                    status: 200,
                    message,
                });
            }
        }

        Ok(data["data"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|t| {
                        t["trend_name"].as_str().map(|name| Trend {
                            name: name.to_string(),
                            tweet_count: t["tweet_count"].as_u64(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

// =============================================================================
// Parsing
// =============================================================================

fn api_error_message(body: &Value) -> Option<String> {
    body["detail"]
        .as_str()
        .or(body["title"].as_str())
        .or_else(|| {
            body["errors"].as_array().and_then(|errors| {
                errors
                    .first()
                    .and_then(|e| e["detail"].as_str().or(e["message"].as_str()))
            })
        })
        .map(String::from)
}

fn parse_time(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_profile(user: &Value) -> Result<Profile> {
    let metrics = &user["public_metrics"];
    Ok(Profile {
        id: user["id"]
            .as_str()
            .ok_or_else(|| TwitterError::ParseError("Missing user id".to_string()))?
            .to_string(),
        username: user["username"].as_str().unwrap_or("").to_string(),
        name: user["name"].as_str().unwrap_or("").to_string(),
        followers_count: metrics["followers_count"].as_u64().unwrap_or(0),
        following_count: metrics["following_count"].as_u64().unwrap_or(0),
    })
}

fn parse_profile_page(data: &Value) -> ProfilePage {
    ProfilePage {
        profiles: data["data"]
            .as_array()
            .map(|arr| arr.iter().filter_map(|u| parse_profile(u).ok()).collect())
            .unwrap_or_default(),
    }
}

type Includes<'a> = HashMap<&'a str, &'a Value>;

fn referenced_id<'a>(tweet: &'a Value, kind: &str) -> Option<&'a str> {
    tweet["referenced_tweets"].as_array().and_then(|refs| {
        refs.iter()
            .find(|r| r["type"].as_str() == Some(kind))
            .and_then(|r| r["id"].as_str())
    })
}

fn parse_tweet(tweet: &Value, users: &Includes<'_>, tweets: &Includes<'_>) -> Tweet {
    let author = tweet["author_id"].as_str().and_then(|id| users.get(id));
    let text = tweet["text"].as_str().unwrap_or("");

    let retweeted = referenced_id(tweet, "retweeted").map(|id| {
        let original = match tweets.get(id) {
            Some(included) => parse_tweet(included, users, &HashMap::new()),
            None => Tweet {
                id: id.to_string(),
                text: text.to_string(),
                ..Default::default()
            },
        };
        Box::new(original)
    });

    Tweet {
        id: tweet["id"].as_str().unwrap_or("").to_string(),
        text: text.to_string(),
        author_id: tweet["author_id"].as_str().map(String::from),
        username: author
            .and_then(|a| a["username"].as_str())
            .unwrap_or("")
            .to_string(),
        created_at: parse_time(&tweet["created_at"]),
        in_reply_to_id: referenced_id(tweet, "replied_to").map(String::from),
        retweeted,
    }
}

fn index_by_id(items: &Value) -> Includes<'_> {
    items
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|item| item["id"].as_str().map(|id| (id, item)))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_tweet_page(data: &Value) -> TweetPage {
    let users = index_by_id(&data["includes"]["users"]);
    let tweets = index_by_id(&data["includes"]["tweets"]);

    TweetPage {
        tweets: data["data"]
            .as_array()
            .map(|arr| arr.iter().map(|t| parse_tweet(t, &users, &tweets)).collect())
            .unwrap_or_default(),
        next_token: data["meta"]["next_token"].as_str().map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tweet_page_resolves_authors() {
        let body = json!({
            "data": [
                {
                    "id": "2",
                    "text": "@bot hello",
                    "author_id": "10",
                    "created_at": "2024-05-01T12:00:00.000Z",
                    "referenced_tweets": [{ "type": "replied_to", "id": "1" }]
                },
                { "id": "3", "text": "orphan", "author_id": "99" }
            ],
            "includes": { "users": [{ "id": "10", "username": "alice", "name": "Alice" }] },
            "meta": { "next_token": "abc" }
        });

        let page = parse_tweet_page(&body);
        assert_eq!(page.tweets.len(), 2);
        assert_eq!(page.tweets[0].username, "alice");
        assert_eq!(page.tweets[0].in_reply_to_id.as_deref(), Some("1"));
        assert!(page.tweets[0].retweeted.is_none());
        assert!(page.tweets[0].created_at.is_some());
        assert_eq!(page.tweets[1].username, "");
        assert_eq!(page.next_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_retweet_uses_included_original() {
        let body = json!({
            "data": [
                {
                    "id": "50",
                    "text": "RT @bob: long original text trunc...",
                    "author_id": "10",
                    "referenced_tweets": [{ "type": "retweeted", "id": "40" }]
                },
                {
                    "id": "51",
                    "text": "RT @bob: not expanded",
                    "referenced_tweets": [{ "type": "retweeted", "id": "41" }]
                }
            ],
            "includes": {
                "users": [{ "id": "20", "username": "bob", "name": "Bob" }],
                "tweets": [{ "id": "40", "text": "long original text in full", "author_id": "20" }]
            }
        });

        let page = parse_tweet_page(&body);
        let first = page.tweets[0].retweeted.as_deref().unwrap();
        assert_eq!(first.id, "40");
        assert_eq!(first.text, "long original text in full");
        assert_eq!(first.username, "bob");

        let second = page.tweets[1].retweeted.as_deref().unwrap();
        assert_eq!(second.id, "41");
        assert_eq!(second.text, "RT @bob: not expanded");
    }

    #[test]
    fn test_parse_profile_requires_id() {
        assert!(matches!(
            parse_profile(&json!({ "username": "ghost" })),
            Err(TwitterError::ParseError(_))
        ));
        let p = parse_profile(&json!({
            "id": "10",
            "username": "alice",
            "public_metrics": { "followers_count": 3, "following_count": 4 }
        }))
        .unwrap();
        assert_eq!((p.followers_count, p.following_count), (3, 4));
    }

    #[test]
    fn test_parse_empty_page() {
        let page = parse_tweet_page(&json!({ "meta": { "result_count": 0 } }));
        assert!(page.tweets.is_empty());
        assert!(page.next_token.is_none());
    }

    #[test]
    fn test_api_error_message_sources() {
        assert_eq!(
            api_error_message(&json!({ "detail": "You are not allowed" })).as_deref(),
            Some("You are not allowed")
        );
        assert_eq!(
            api_error_message(&json!({ "errors": [{ "message": "Not Found" }] })).as_deref(),
            Some("Not Found")
        );
        assert_eq!(api_error_message(&json!({ "data": {} })), None);
    }

    #[test]
    fn test_single_data_reports_body_errors() {
        let body = json!({ "errors": [{ "detail": "Could not find user with username: [nobody]." }] });
        let err = XClient::single_data(&body).unwrap_err();
        assert!(err.to_string().contains("Could not find user"));
        assert!(matches!(
            XClient::single_data(&json!({})),
            Err(TwitterError::EmptyResponse)
        ));
    }
}
