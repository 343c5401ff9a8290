//! Likes and retweets.

use std::sync::Arc;

use crate::catalog::CommandArgs;
use crate::client::XClient;
use crate::error::Result;

/// `like_tweet`
pub async fn like_tweet(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let tweet_id = args.id("tweet_id")?;
    Ok(if client.like_tweet(&tweet_id).await? {
        format!("Liked tweet {tweet_id}")
    } else {
        format!("Tweet {tweet_id} was not liked")
    })
}

/// `unlike_tweet`
pub async fn unlike_tweet(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let tweet_id = args.id("tweet_id")?;
    Ok(if client.unlike_tweet(&tweet_id).await? {
        format!("Unliked tweet {tweet_id}")
    } else {
        format!("Tweet {tweet_id} is still liked")
    })
}

/// `retweet`
pub async fn retweet(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let tweet_id = args.id("tweet_id")?;
    Ok(if client.retweet(&tweet_id).await? {
        format!("Retweeted tweet {tweet_id}")
    } else {
        format!("Tweet {tweet_id} was not retweeted")
    })
}

/// `unretweet`
pub async fn unretweet(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let tweet_id = args.id("tweet_id")?;
    Ok(if client.unretweet(&tweet_id).await? {
        format!("Removed retweet of tweet {tweet_id}")
    } else {
        format!("Tweet {tweet_id} is still retweeted")
    })
}
