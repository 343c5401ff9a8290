//! Command handlers and the catalog they are registered under.
//!
//! Every handler has the same shape: it takes the shared client and the
//! host's string arguments, validates the arguments before touching the
//! network, makes its API call(s), and renders a single line (or block) of
//! text. Errors are turned into failed [`CommandOutput`]s by [`command`].

mod engagement;
mod social;
mod timeline;
mod tweets;

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use tracing::info;

use crate::catalog::{CommandArgs, CommandDescriptor, CommandHandler, CommandOutput};
use crate::client::XClient;
use crate::error::Result;
use crate::host::PromptGenerator;
use crate::types::Tweet;

pub use engagement::{like_tweet, retweet, unlike_tweet, unretweet};
pub use social::{
    follow_user, get_blocked_users, get_tweet_retweeters, get_user_follow_counts, search_users,
    unfollow_user,
};
pub use timeline::{
    get_liked_tweets, get_mentions, get_trending_topics, get_tweet_replies, get_user_mentions,
    get_user_retweets, get_user_tweets, search_tweets, search_twitter_user,
};
pub use tweets::{post_reply, post_tweet, send_direct_message, send_tweet};

/// Default page size when a command's `count` argument is omitted.
pub const DEFAULT_COUNT: u32 = 10;

/// Wrap an async handler into a descriptor bound to `client`.
pub fn command<F, Fut>(
    client: &Arc<XClient>,
    name: &'static str,
    label: &str,
    args: &[&str],
    run: F,
) -> CommandDescriptor
where
    F: Fn(Arc<XClient>, CommandArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    let client = Arc::clone(client);
    let handler: CommandHandler = Arc::new(move |args: CommandArgs| {
        info!("Executing command {}", name);
        let fut = run(Arc::clone(&client), args);
        async move { CommandOutput::from_result(name, fut.await) }.boxed()
    });
    CommandDescriptor::new(name, label, args, handler)
}

/// All commands, in registration order.
pub fn descriptors(client: &Arc<XClient>) -> Vec<CommandDescriptor> {
    vec![
        command(client, "post_tweet", "Post Tweet", &["tweet_text"], post_tweet),
        command(
            client,
            "post_reply",
            "Post Twitter Reply",
            &["tweet_text", "tweet_id"],
            post_reply,
        ),
        command(client, "get_mentions", "Get Twitter Mentions", &[], get_mentions),
        command(
            client,
            "search_twitter_user",
            "Search Twitter User",
            &["targetUser", "numOfItems"],
            search_twitter_user,
        ),
        command(client, "send_tweet", "Send Tweet", &["tweet_text"], send_tweet),
        command(
            client,
            "get_user_tweets",
            "Get User Tweets",
            &["user_id", "count"],
            get_user_tweets,
        ),
        command(
            client,
            "search_tweets",
            "Search Tweets",
            &["query", "count"],
            search_tweets,
        ),
        command(
            client,
            "get_trending_topics",
            "Get Trending Topics",
            &[],
            get_trending_topics,
        ),
        command(client, "follow_user", "Follow User", &["user_id"], follow_user),
        command(client, "unfollow_user", "Unfollow User", &["user_id"], unfollow_user),
        command(
            client,
            "send_direct_message",
            "Send Direct Message",
            &["user_id", "message_text"],
            send_direct_message,
        ),
        command(client, "like_tweet", "Like Tweet", &["tweet_id"], like_tweet),
        command(client, "unlike_tweet", "Unlike Tweet", &["tweet_id"], unlike_tweet),
        command(client, "retweet", "Retweet", &["tweet_id"], retweet),
        command(client, "unretweet", "Unretweet", &["tweet_id"], unretweet),
        command(
            client,
            "get_tweet_replies",
            "Get Tweet Replies",
            &["tweet_id", "count"],
            get_tweet_replies,
        ),
        command(
            client,
            "get_user_mentions",
            "Get User Mentions",
            &["user_id", "count"],
            get_user_mentions,
        ),
        command(
            client,
            "get_liked_tweets",
            "Get Liked Tweets",
            &["user_id", "count"],
            get_liked_tweets,
        ),
        command(
            client,
            "get_tweet_retweeters",
            "Get Tweet Retweeters",
            &["tweet_id", "count"],
            get_tweet_retweeters,
        ),
        command(
            client,
            "get_user_follow_counts",
            "Get User Follow Counts",
            &["user_id"],
            get_user_follow_counts,
        ),
        command(
            client,
            "get_blocked_users",
            "Get Blocked Users",
            &["count"],
            get_blocked_users,
        ),
        command(
            client,
            "get_user_retweets",
            "Get User Retweets",
            &["user_id", "count"],
            get_user_retweets,
        ),
        command(client, "search_users", "Search Users", &["query", "count"], search_users),
    ]
}

/// Register every command with the host's prompt generator.
pub fn register_all(client: &Arc<XClient>, prompt: &mut dyn PromptGenerator) -> Result<()> {
    for descriptor in descriptors(client) {
        prompt.add_command(descriptor)?;
    }
    Ok(())
}

// =============================================================================
// Formatting
// =============================================================================

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn handle_of(tweet: &Tweet) -> &str {
    if !tweet.username.is_empty() {
        &tweet.username
    } else {
        tweet.author_id.as_deref().unwrap_or("unknown")
    }
}

fn lines<T>(items: &[T], render: impl Fn(&T) -> String) -> String {
    items.iter().map(render).collect::<Vec<_>>().join("\n")
}

/// Fixed-width table with Time, User, ID and Tweet columns.
fn tweet_table(tweets: &[Tweet], fallback_user: &str) -> String {
    let rows: Vec<[String; 4]> = tweets
        .iter()
        .map(|t| {
            let user = if t.username.is_empty() {
                fallback_user.to_string()
            } else {
                t.username.clone()
            };
            [
                t.created_at
                    .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                user,
                t.id.clone(),
                one_line(&t.text),
            ]
        })
        .collect();

    let header = ["Time", "User", "ID", "Tweet"].map(String::from);
    let mut widths = [0usize; 3];
    for row in std::iter::once(&header).chain(rows.iter()) {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    std::iter::once(&header)
        .chain(rows.iter())
        .map(|row| {
            format!(
                "{:<w0$}  {:<w1$}  {:<w2$}  {}",
                row[0],
                row[1],
                row[2],
                row[3],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn tweet(id: &str, user: &str, text: &str) -> Tweet {
        Tweet {
            id: id.to_string(),
            text: text.to_string(),
            username: user.to_string(),
            created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_tweet_table_alignment() {
        let table = tweet_table(
            &[tweet("1", "alice", "hello\nworld"), tweet("22", "", "second")],
            "bob",
        );
        assert_eq!(
            table,
            "Time                 User   ID  Tweet\n\
             2024-05-01 12:00:00  alice  1   hello world\n\
             2024-05-01 12:00:00  bob    22  second"
        );
    }

    #[test]
    fn test_handle_of_falls_back_to_author_id() {
        let mut t = tweet("1", "", "x");
        t.author_id = Some("77".into());
        assert_eq!(handle_of(&t), "77");
        t.author_id = None;
        assert_eq!(handle_of(&t), "unknown");
    }

    #[test]
    fn test_one_line() {
        assert_eq!(one_line("  a\n\n b\tc "), "a b c");
    }
}
