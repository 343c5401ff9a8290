//! Type definitions for the X API v2 entities the commands touch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    /// User ID
    pub id: String,
    /// Username (handle without @)
    pub username: String,
    /// Display name
    pub name: String,
    /// Follower count
    pub followers_count: u64,
    /// Following count
    pub following_count: u64,
}

/// Tweet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tweet {
    /// Tweet ID
    pub id: String,
    /// Tweet text
    pub text: String,
    /// Author ID
    pub author_id: Option<String>,
    /// Author username (from includes)
    pub username: String,
    /// Created at timestamp
    pub created_at: Option<DateTime<Utc>>,
    /// Tweet this one replies to
    pub in_reply_to_id: Option<String>,
    /// Original tweet when this one is a retweet. Carries the included
    /// tweet's full text when the API expanded it.
    pub retweeted: Option<Box<Tweet>>,
}

/// Result of creating a tweet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetCreateResult {
    /// Tweet ID
    pub id: String,
    /// Tweet text as stored by the API
    pub text: String,
}

/// Result of a follow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowState {
    /// Now following
    Following,
    /// Protected account, request awaiting approval
    Pending,
    /// The API reported neither
    NotFollowing,
}

/// Result of sending a direct message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectMessageResult {
    /// ID of the created DM event
    pub event_id: String,
}

/// Trending topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trend {
    /// Trend name (hashtag or phrase)
    pub name: String,
    /// Approximate tweet volume, when reported
    pub tweet_count: Option<u64>,
}

/// One page of tweets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TweetPage {
    /// Tweets on this page, newest first
    pub tweets: Vec<Tweet>,
    /// Pagination token for next page
    pub next_token: Option<String>,
}

/// One page of profiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePage {
    /// Profiles on this page
    pub profiles: Vec<Profile>,
}
