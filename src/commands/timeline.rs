//! Read commands over timelines, search and trends.

use std::sync::Arc;

use super::{handle_of, lines, one_line, tweet_table, DEFAULT_COUNT};
use crate::catalog::CommandArgs;
use crate::client::XClient;
use crate::error::{Result, TwitterError};
use crate::types::Tweet;

fn take(tweets: Vec<Tweet>, count: u32) -> Vec<Tweet> {
    tweets.into_iter().take(count as usize).collect()
}

/// `get_mentions`: the most recent mention of the authenticated user.
pub async fn get_mentions(client: Arc<XClient>, _args: CommandArgs) -> Result<String> {
    let me = client.authenticated_user_id().await?;
    let page = client.get_mentions(&me, 5, None).await?;

    Ok(match page.tweets.first() {
        Some(tweet) => format!(
            "@{} Replied: {} Tweet ID: {}",
            handle_of(tweet),
            one_line(&tweet.text),
            tweet.id
        ),
        None => "No mentions found.".to_string(),
    })
}

/// `search_twitter_user`: up to `numOfItems` recent tweets from `targetUser`,
/// following pagination until the count is met or the timeline runs out.
pub async fn search_twitter_user(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let target = args.required("targetUser")?.trim_start_matches('@').to_string();
    if target.is_empty() {
        return Err(TwitterError::invalid_argument("targetUser", "username is empty"));
    }
    let wanted = args.count("numOfItems")? as usize;

    let profile = client.get_profile(&target).await?;

    let mut collected: Vec<Tweet> = Vec::with_capacity(wanted.min(100));
    let mut token: Option<String> = None;
    while collected.len() < wanted {
        let remaining = wanted - collected.len();
        let page = client
            .get_user_tweets(&profile.id, remaining as u32, token.as_deref())
            .await?;
        if page.tweets.is_empty() {
            break;
        }
        collected.extend(page.tweets.into_iter().take(remaining));
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    if collected.is_empty() {
        return Ok(format!("No tweets found for @{}.", profile.username));
    }
    Ok(tweet_table(&collected, &profile.username))
}

/// `get_user_tweets`: recent tweets from `user_id`.
pub async fn get_user_tweets(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let user_id = args.id("user_id")?;
    let count = args.count_or("count", DEFAULT_COUNT)?;

    let page = client.get_user_tweets(&user_id, count, None).await?;
    let tweets = take(page.tweets, count);
    if tweets.is_empty() {
        return Ok(format!("No tweets found for user {user_id}."));
    }
    Ok(lines(&tweets, |t| {
        format!("{} - Tweet ID: {}", one_line(&t.text), t.id)
    }))
}

/// `search_tweets`: recent tweets matching `query`.
pub async fn search_tweets(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let query = args.required("query")?;
    let count = args.count_or("count", DEFAULT_COUNT)?;

    let page = client.search_recent(query, count).await?;
    let tweets = take(page.tweets, count);
    if tweets.is_empty() {
        return Ok(format!("No tweets found matching '{query}'."));
    }
    Ok(lines(&tweets, |t| {
        format!("@{}: {} - Tweet ID: {}", handle_of(t), one_line(&t.text), t.id)
    }))
}

/// `get_trending_topics`: trends for the configured location.
pub async fn get_trending_topics(client: Arc<XClient>, _args: CommandArgs) -> Result<String> {
    let trends = client.get_trends(client.config().trends_woeid).await?;
    if trends.is_empty() {
        return Ok("No trending topics available.".to_string());
    }

    let mut out = String::from("Trending topics:");
    for (i, trend) in trends.iter().enumerate() {
        out.push_str(&format!("\n{}. {}", i + 1, trend.name));
        if let Some(n) = trend.tweet_count {
            out.push_str(&format!(" ({n} tweets)"));
        }
    }
    Ok(out)
}

/// `get_tweet_replies`: direct replies to `tweet_id` from the last week.
pub async fn get_tweet_replies(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let tweet_id = args.id("tweet_id")?;
    let count = args.count_or("count", DEFAULT_COUNT)?;

    let page = client
        .search_recent(&format!("conversation_id:{tweet_id}"), count)
        .await?;
    let replies: Vec<Tweet> = page
        .tweets
        .into_iter()
        .filter(|t| t.in_reply_to_id.as_deref() == Some(tweet_id.as_str()))
        .take(count as usize)
        .collect();
    if replies.is_empty() {
        return Ok(format!("No replies found for tweet {tweet_id}."));
    }
    Ok(lines(&replies, |t| {
        format!("{} - Reply ID: {}", one_line(&t.text), t.id)
    }))
}

/// `get_user_mentions`: recent mentions of `user_id`.
pub async fn get_user_mentions(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let user_id = args.id("user_id")?;
    let count = args.count_or("count", DEFAULT_COUNT)?;

    let page = client.get_mentions(&user_id, count, None).await?;
    let tweets = take(page.tweets, count);
    if tweets.is_empty() {
        return Ok(format!("No mentions found for user {user_id}."));
    }
    Ok(lines(&tweets, |t| {
        format!("{} - Mention ID: {}", one_line(&t.text), t.id)
    }))
}

/// `get_liked_tweets`: tweets liked by `user_id`.
pub async fn get_liked_tweets(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let user_id = args.id("user_id")?;
    let count = args.count_or("count", DEFAULT_COUNT)?;

    let page = client.get_liked_tweets(&user_id, count).await?;
    let tweets = take(page.tweets, count);
    if tweets.is_empty() {
        return Ok(format!("No liked tweets found for user {user_id}."));
    }
    Ok(lines(&tweets, |t| {
        format!("{} - Tweet ID: {}", one_line(&t.text), t.id)
    }))
}

/// `get_user_retweets`: retweets among the last `count` tweets of `user_id`.
pub async fn get_user_retweets(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let user_id = args.id("user_id")?;
    let count = args.count_or("count", DEFAULT_COUNT)?;

    let page = client.get_user_tweets(&user_id, count, None).await?;
    let retweets: Vec<Tweet> = page
        .tweets
        .into_iter()
        .take(count as usize)
        .filter(|t| t.retweeted.is_some())
        .collect();
    if retweets.is_empty() {
        return Ok(format!("No retweets found for user {user_id}."));
    }
    Ok(lines(&retweets, |t| {
        let original = t.retweeted.as_deref().map_or(t.text.as_str(), |o| o.text.as_str());
        format!("{} - Retweet ID: {}", one_line(original), t.id)
    }))
}
