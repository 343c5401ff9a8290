//! Twitter/X command plugin for autonomous agents
//!
//! This crate exposes the X API v2 as a catalog of named, string-argument
//! commands that an agent host registers while building its prompt and later
//! invokes on the model's behalf.
//!
//! # Features
//!
//! - Post tweets, replies and direct messages
//! - Read mentions, user timelines, search results and trends
//! - Follow, like and retweet (and undo each)
//! - OAuth 1.0a user-context signing
//! - Dry-run mode for mutating calls
//!
//! # Example
//!
//! ```rust,no_run
//! use elizaos_plugin_twitter_commands::{CommandArgs, TwitterPlugin};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let plugin = TwitterPlugin::from_env()?;
//! let catalog = plugin.catalog()?;
//!
//! let output = catalog
//!     .execute("search_tweets", CommandArgs::new().with("query", "rust").with("count", "5"))
//!     .await;
//! println!("{}", output.text);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod auth;
pub mod catalog;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod plugin;
pub mod types;

// Re-export commonly used types
pub use crate::catalog::{CommandArgs, CommandCatalog, CommandDescriptor, CommandOutput};
pub use crate::client::XClient;
pub use crate::config::{Credentials, TwitterConfig};
pub use crate::error::{ErrorKind, Result, TwitterError};
pub use crate::host::{AgentPlugin, PromptGenerator};
pub use crate::plugin::TwitterPlugin;
