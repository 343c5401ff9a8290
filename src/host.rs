//! Plugin interface expected by the agent host.
//!
//! The host asks each plugin which lifecycle hooks it implements through the
//! `can_handle_*` queries and only calls the hooks answered with `true`. Every
//! hook has a pass-through default, so a plugin overrides just what it uses.

use serde::{Deserialize, Serialize};

use crate::catalog::CommandDescriptor;
use crate::error::Result;

/// Target of command registration during prompt construction.
pub trait PromptGenerator {
    /// Register one command. Fails if the name is already taken.
    fn add_command(&mut self, descriptor: CommandDescriptor) -> Result<()>;
}

/// A chat message exchanged between the host and the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// `system`, `user` or `assistant`
    pub role: String,
    /// Message body
    pub content: String,
}

/// Lifecycle hooks a host may call on a plugin.
pub trait AgentPlugin: Send + Sync {
    /// Plugin name.
    fn name(&self) -> &str;

    /// Plugin version.
    fn version(&self) -> &str;

    /// One-line description.
    fn description(&self) -> &str;

    /// Whether the host should call [`on_response`](Self::on_response).
    fn can_handle_on_response(&self) -> bool {
        false
    }

    /// Called with each model response.
    fn on_response(&self, response: String) -> String {
        response
    }

    /// Whether the host should call [`post_prompt`](Self::post_prompt).
    fn can_handle_post_prompt(&self) -> bool {
        false
    }

    /// Called once while the host builds its prompt; registers commands.
    fn post_prompt(&self, _prompt: &mut dyn PromptGenerator) -> Result<()> {
        Ok(())
    }

    /// Whether the host should call [`on_planning`](Self::on_planning).
    fn can_handle_on_planning(&self) -> bool {
        false
    }

    /// Called before the planning completion; may return extra context.
    fn on_planning(&self, _messages: &[Message]) -> Option<String> {
        None
    }

    /// Whether the host should call [`post_planning`](Self::post_planning).
    fn can_handle_post_planning(&self) -> bool {
        false
    }

    /// Called after the planning completion.
    fn post_planning(&self, response: String) -> String {
        response
    }

    /// Whether the host should call [`pre_instruction`](Self::pre_instruction).
    fn can_handle_pre_instruction(&self) -> bool {
        false
    }

    /// Called before the instruction completion.
    fn pre_instruction(&self, messages: Vec<Message>) -> Vec<Message> {
        messages
    }

    /// Whether the host should call [`on_instruction`](Self::on_instruction).
    fn can_handle_on_instruction(&self) -> bool {
        false
    }

    /// Called during the instruction completion.
    fn on_instruction(&self, _messages: &[Message]) -> Option<String> {
        None
    }

    /// Whether the host should call [`post_instruction`](Self::post_instruction).
    fn can_handle_post_instruction(&self) -> bool {
        false
    }

    /// Called after the instruction completion.
    fn post_instruction(&self, response: String) -> String {
        response
    }

    /// Whether the host should call [`pre_command`](Self::pre_command).
    fn can_handle_pre_command(&self) -> bool {
        false
    }

    /// Called before any command runs; may rewrite the name and arguments.
    fn pre_command(
        &self,
        command_name: String,
        arguments: serde_json::Value,
    ) -> (String, serde_json::Value) {
        (command_name, arguments)
    }

    /// Whether the host should call [`post_command`](Self::post_command).
    fn can_handle_post_command(&self) -> bool {
        false
    }

    /// Called after any command runs.
    fn post_command(&self, _command_name: &str, response: String) -> String {
        response
    }

    /// Whether the host should call [`handle_chat_completion`](Self::handle_chat_completion).
    fn can_handle_chat_completion(
        &self,
        _messages: &[Message],
        _model: &str,
        _temperature: f32,
        _max_tokens: u32,
    ) -> bool {
        false
    }

    /// Replace the host's chat completion.
    fn handle_chat_completion(
        &self,
        _messages: &[Message],
        _model: &str,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Option<String> {
        None
    }
}
