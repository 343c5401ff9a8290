//! Follows, retweeters, follower counts and blocks.

use std::sync::Arc;

use super::{lines, DEFAULT_COUNT};
use crate::catalog::CommandArgs;
use crate::client::XClient;
use crate::error::Result;
use crate::types::{FollowState, Profile};

fn profile_line(profile: &Profile, id_label: &str) -> String {
    let name = if profile.name.is_empty() {
        &profile.username
    } else {
        &profile.name
    };
    format!("{} - {}: {}", name, id_label, profile.id)
}

/// `follow_user`
pub async fn follow_user(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let user_id = args.id("user_id")?;
    Ok(match client.follow_user(&user_id).await? {
        FollowState::Following => format!("Followed user {user_id}"),
        FollowState::Pending => format!("Follow request sent to user {user_id} (pending approval)"),
        FollowState::NotFollowing => format!("Follow of user {user_id} was not applied"),
    })
}

/// `unfollow_user`
pub async fn unfollow_user(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let user_id = args.id("user_id")?;
    Ok(if client.unfollow_user(&user_id).await? {
        format!("Unfollowed user {user_id}")
    } else {
        format!("User {user_id} is still followed")
    })
}

/// `get_tweet_retweeters`: accounts that retweeted `tweet_id`.
pub async fn get_tweet_retweeters(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let tweet_id = args.id("tweet_id")?;
    let count = args.count_or("count", DEFAULT_COUNT)?;

    let page = client.get_retweeters(&tweet_id, count).await?;
    let profiles: Vec<Profile> = page.profiles.into_iter().take(count as usize).collect();
    if profiles.is_empty() {
        return Ok(format!("No retweeters found for tweet {tweet_id}."));
    }
    Ok(lines(&profiles, |p| profile_line(p, "Retweeter ID")))
}

/// `get_user_follow_counts`: follower and following totals for `user_id`.
pub async fn get_user_follow_counts(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let user_id = args.id("user_id")?;
    let profile = client.get_user(&user_id).await?;
    Ok(format!(
        "Followers: {}\nFollowing: {}",
        profile.followers_count, profile.following_count
    ))
}

/// `get_blocked_users`: accounts blocked by the authenticated user.
pub async fn get_blocked_users(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let count = args.count_or("count", DEFAULT_COUNT)?;
    let me = client.authenticated_user_id().await?;

    let page = client.get_blocking(&me, count).await?;
    let profiles: Vec<Profile> = page.profiles.into_iter().take(count as usize).collect();
    if profiles.is_empty() {
        return Ok("No blocked users found.".to_string());
    }
    Ok(lines(&profiles, |p| profile_line(p, "User ID")))
}

/// `search_users`: accounts matching `query`.
pub async fn search_users(client: Arc<XClient>, args: CommandArgs) -> Result<String> {
    let query = args.required("query")?;
    let count = args.count_or("count", DEFAULT_COUNT)?;

    let page = client.search_users(query, count).await?;
    let profiles: Vec<Profile> = page.profiles.into_iter().take(count as usize).collect();
    if profiles.is_empty() {
        return Ok(format!("No users found matching '{query}'."));
    }
    Ok(lines(&profiles, |p| profile_line(p, "User ID")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_line_prefers_display_name() {
        let mut p = Profile {
            id: "9".into(),
            username: "alice".into(),
            name: "Alice A".into(),
            ..Default::default()
        };
        assert_eq!(profile_line(&p, "User ID"), "Alice A - User ID: 9");
        p.name.clear();
        assert_eq!(profile_line(&p, "User ID"), "alice - User ID: 9");
    }
}
