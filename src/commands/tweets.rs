//! Posting: tweets, replies and direct messages.

use std::sync::Arc;

use crate::catalog::CommandArgs;
use crate::client::XClient;
use crate::error::Result;

/// `post_tweet`: publish `tweet_text`.
pub async fn post_tweet(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let text = args.text("tweet_text")?;
    let created = client.create_tweet(text, None).await?;
    Ok(format!("Success! Tweet: {}", created.text))
}

/// `post_reply`: publish `tweet_text` as a reply to `tweet_id`.
pub async fn post_reply(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let text = args.text("tweet_text")?;
    let tweet_id = args.id("tweet_id")?;
    let created = client.create_tweet(text, Some(&tweet_id)).await?;
    Ok(format!("Success! Tweet: {}", created.text))
}

/// `send_tweet`: publish `tweet_text` and report the new id.
pub async fn send_tweet(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let text = args.text("tweet_text")?;
    let created = client.create_tweet(text, None).await?;
    Ok(format!("Tweet sent successfully! Tweet ID: {}", created.id))
}

/// `send_direct_message`: message `user_id` with `message_text`.
pub async fn send_direct_message(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let user_id = args.id("user_id")?;
    let text = args.text("message_text")?;
    let sent = client.send_direct_message(&user_id, text).await?;
    Ok(format!(
        "Direct message sent to {}. Event ID: {}",
        user_id, sent.event_id
    ))
}
