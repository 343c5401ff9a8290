//! The host-facing plugin.

use std::sync::Arc;

use tracing::info;

use crate::catalog::CommandCatalog;
use crate::client::XClient;
use crate::commands;
use crate::config::TwitterConfig;
use crate::error::Result;
use crate::host::{AgentPlugin, PromptGenerator};

/// Plugin name reported to the host.
pub const PLUGIN_NAME: &str = "twitter-commands";

/// Twitter/X command plugin.
///
/// Registers its commands during `post_prompt` and implements no other hook.
#[derive(Debug, Clone)]
pub struct TwitterPlugin {
    client: Arc<XClient>,
}

impl TwitterPlugin {
    /// Wrap an existing client.
    pub fn new(client: XClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Build from a config.
    pub fn from_config(config: TwitterConfig) -> Result<Self> {
        Ok(Self::new(XClient::new(config)?))
    }

    /// Build from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_config(TwitterConfig::from_env()?)
    }

    /// Shared client handed to every command.
    pub fn client(&self) -> &Arc<XClient> {
        &self.client
    }

    /// A standalone catalog holding every command.
    pub fn catalog(&self) -> Result<CommandCatalog> {
        let mut catalog = CommandCatalog::new();
        self.post_prompt(&mut catalog)?;
        Ok(catalog)
    }
}

impl AgentPlugin for TwitterPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &str {
        "Twitter/X API commands: post, reply, search, follow, like, retweet and direct messages"
    }

    fn can_handle_post_prompt(&self) -> bool {
        true
    }

    fn post_prompt(&self, prompt: &mut dyn PromptGenerator) -> Result<()> {
        commands::register_all(&self.client, prompt)?;
        info!(
            "Registered Twitter commands (dry_run: {})",
            self.client.is_dry_run()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::host::Message;

    fn plugin() -> TwitterPlugin {
        let creds = Credentials::new("ck", "cs", "12345-at", "ats");
        TwitterPlugin::from_config(TwitterConfig::new(creds)).unwrap()
    }

    #[test]
    fn test_only_post_prompt_is_handled() {
        let p = plugin();
        assert!(p.can_handle_post_prompt());
        assert!(!p.can_handle_on_response());
        assert!(!p.can_handle_on_planning());
        assert!(!p.can_handle_post_planning());
        assert!(!p.can_handle_pre_instruction());
        assert!(!p.can_handle_on_instruction());
        assert!(!p.can_handle_post_instruction());
        assert!(!p.can_handle_pre_command());
        assert!(!p.can_handle_post_command());
        assert!(!p.can_handle_chat_completion(&[], "model", 0.0, 16));
    }

    #[test]
    fn test_default_hooks_pass_through() {
        let p = plugin();
        assert_eq!(p.on_response("r".into()), "r");
        assert_eq!(p.post_planning("plan".into()), "plan");
        let msgs = vec![Message {
            role: "user".into(),
            content: "hi".into(),
        }];
        assert_eq!(p.pre_instruction(msgs.clone()), msgs);
        assert!(p.on_instruction(&msgs).is_none());
        assert!(p.handle_chat_completion(&msgs, "m", 0.5, 8).is_none());
    }

    #[test]
    fn test_metadata() {
        let p = plugin();
        assert_eq!(p.name(), "twitter-commands");
        assert_eq!(p.version(), env!("CARGO_PKG_VERSION"));
        assert!(!p.description().is_empty());
    }

    #[test]
    fn test_catalog_twice_is_independent() {
        let p = plugin();
        assert_eq!(p.catalog().unwrap().len(), 23);
        assert_eq!(p.catalog().unwrap().len(), 23);
    }

    #[test]
    fn test_registering_twice_into_one_catalog_fails() {
        let p = plugin();
        let mut catalog = p.catalog().unwrap();
        let err = p.post_prompt(&mut catalog).unwrap_err();
        assert_eq!(err.to_string(), "Command 'post_tweet' is already registered");
    }
}
