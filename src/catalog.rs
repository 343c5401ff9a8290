//! Command catalog: descriptors, arguments, dispatch.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ErrorKind, Result, TwitterError};
use crate::host::PromptGenerator;

/// Arguments passed by the host to a command. Values are always strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    values: Vec<(String, String)>,
}

impl CommandArgs {
    /// Empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an argument.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace an argument.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name.to_string(), value)),
        }
    }

    /// Build from a JSON object; scalars are stringified, `null` is dropped.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            TwitterError::invalid_argument("arguments", "expected a JSON object")
        })?;

        let mut args = Self::new();
        for (key, v) in object {
            match v {
                Value::Null => {}
                Value::String(s) => args.insert(key, s.as_str()),
                Value::Number(n) => args.insert(key, n.to_string()),
                Value::Bool(b) => args.insert(key, b.to_string()),
                _ => {
                    return Err(TwitterError::invalid_argument(
                        key,
                        "expected a string, number or boolean",
                    ))
                }
            }
        }
        Ok(args)
    }

    /// Raw value, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A present, non-blank argument, trimmed.
    pub fn required(&self, name: &str) -> Result<&str> {
        self.get(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| TwitterError::MissingArgument(name.to_string()))
    }

    /// A present, non-blank argument, exactly as supplied.
    ///
    /// Used for message bodies, where leading indentation and trailing
    /// newlines are content.
    pub fn text(&self, name: &str) -> Result<&str> {
        self.get(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| TwitterError::MissingArgument(name.to_string()))
    }

    /// A strictly positive integer argument.
    pub fn count(&self, name: &str) -> Result<u32> {
        let raw = self.required(name)?;
        match raw.parse::<u32>() {
            Ok(0) => Err(TwitterError::invalid_argument(name, "must be greater than zero")),
            Ok(n) => Ok(n),
            Err(_) => Err(TwitterError::invalid_argument(
                name,
                format!("'{raw}' is not a positive integer"),
            )),
        }
    }

    /// Like [`count`](Self::count), falling back to `default` when absent.
    pub fn count_or(&self, name: &str, default: u32) -> Result<u32> {
        match self.get(name).map(str::trim) {
            None | Some("") => Ok(default),
            Some(_) => self.count(name),
        }
    }

    /// A numeric entity id, trimmed but otherwise passed through unchanged.
    pub fn id(&self, name: &str) -> Result<String> {
        let raw = self.required(name)?;
        if raw.bytes().all(|b| b.is_ascii_digit()) && raw.parse::<u64>().is_ok() {
            Ok(raw.to_string())
        } else {
            Err(TwitterError::invalid_argument(
                name,
                format!("'{raw}' is not a numeric id"),
            ))
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CommandArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (k, v) in iter {
            let k = k.into();
            args.insert(&k, v);
        }
        args
    }
}

/// Outcome of one command invocation, as reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Command that produced this output.
    pub command: String,
    /// Whether the command succeeded.
    pub success: bool,
    /// Human-readable text for the agent.
    pub text: String,
    /// Failure classification, `None` on success.
    pub error: Option<ErrorKind>,
}

impl CommandOutput {
    /// Successful output.
    pub fn success(command: &str, text: impl Into<String>) -> Self {
        Self {
            command: command.to_string(),
            success: true,
            text: text.into(),
            error: None,
        }
    }

    /// Failed output carrying the error's kind and message.
    pub fn failure(command: &str, error: &TwitterError) -> Self {
        Self {
            command: command.to_string(),
            success: false,
            text: format!("Error executing {command}: {error}"),
            error: Some(error.kind()),
        }
    }

    /// Convert a handler result.
    pub fn from_result(command: &str, result: Result<String>) -> Self {
        match result {
            Ok(text) => Self::success(command, text),
            Err(e) => {
                warn!("Command {} failed: {}", command, e);
                Self::failure(command, &e)
            }
        }
    }
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Callable behind a command. Owns whatever it needs (usually an `Arc` of
/// the API client) so the host can invoke it without extra context.
pub type CommandHandler = Arc<dyn Fn(CommandArgs) -> BoxFuture<'static, CommandOutput> + Send + Sync>;

/// One host-invocable command.
#[derive(Clone)]
pub struct CommandDescriptor {
    /// Unique command name.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Ordered argument name -> placeholder pairs.
    pub args: Vec<(String, String)>,
    /// Implementation.
    pub handler: CommandHandler,
}

impl CommandDescriptor {
    /// Create a descriptor; each argument gets a `<name>` placeholder.
    pub fn new(name: &str, label: &str, args: &[&str], handler: CommandHandler) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            args: args
                .iter()
                .map(|a| (a.to_string(), format!("<{a}>")))
                .collect(),
            handler,
        }
    }

    /// Run the handler.
    pub async fn invoke(&self, args: CommandArgs) -> CommandOutput {
        (self.handler)(args).await
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Registry of the commands a plugin exposes. Read-only once built.
#[derive(Debug, Default, Clone)]
pub struct CommandCatalog {
    commands: Vec<CommandDescriptor>,
}

impl CommandCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor. Names must be unique.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<()> {
        if self.get(&descriptor.name).is_some() {
            return Err(TwitterError::DuplicateCommand(descriptor.name));
        }
        debug!("Registered command {}", descriptor.name);
        self.commands.push(descriptor);
        Ok(())
    }

    /// Look up a command by name.
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    /// Command names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True before anything is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Prompt-ready listing, one numbered line per command.
    pub fn describe(&self) -> String {
        self.commands
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let args = c
                    .args
                    .iter()
                    .map(|(k, v)| format!("\"{k}\": \"{v}\""))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}. {}: \"{}\", args: {}", i + 1, c.label, c.name, args)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Run a command by name. Unknown names produce a failed output.
    pub async fn execute(&self, name: &str, args: CommandArgs) -> CommandOutput {
        match self.get(name) {
            Some(command) => command.invoke(args).await,
            None => CommandOutput::from_result(
                name,
                Err(TwitterError::UnknownCommand(name.to_string())),
            ),
        }
    }
}

impl PromptGenerator for CommandCatalog {
    fn add_command(&mut self, descriptor: CommandDescriptor) -> Result<()> {
        self.register(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn echo(name: &'static str) -> CommandHandler {
        Arc::new(move |args: CommandArgs| {
            async move {
                CommandOutput::from_result(name, args.required("text").map(|t| t.to_string()))
            }
            .boxed()
        })
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut catalog = CommandCatalog::new();
        catalog
            .register(CommandDescriptor::new("like_tweet", "Like Tweet", &["tweet_id"], echo("like_tweet")))
            .unwrap();
        let err = catalog
            .register(CommandDescriptor::new("like_tweet", "Like It Again", &[], echo("like_tweet")))
            .unwrap_err();
        assert!(matches!(err, TwitterError::DuplicateCommand(ref n) if n == "like_tweet"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("like_tweet").unwrap().label, "Like Tweet");
    }

    #[test]
    fn test_describe_lists_in_order() {
        let mut catalog = CommandCatalog::new();
        catalog
            .register(CommandDescriptor::new("post_tweet", "Post Tweet", &["tweet_text"], echo("post_tweet")))
            .unwrap();
        catalog
            .register(CommandDescriptor::new("get_mentions", "Get Twitter Mentions", &[], echo("get_mentions")))
            .unwrap();

        assert_eq!(
            catalog.describe(),
            "1. Post Tweet: \"post_tweet\", args: \"tweet_text\": \"<tweet_text>\"\n\
             2. Get Twitter Mentions: \"get_mentions\", args: "
        );
        assert_eq!(catalog.names(), vec!["post_tweet", "get_mentions"]);
    }

    #[tokio::test]
    async fn test_execute_dispatches_and_reports_unknown() {
        let mut catalog = CommandCatalog::new();
        catalog
            .register(CommandDescriptor::new("echo", "Echo", &["text"], echo("echo")))
            .unwrap();

        let ok = catalog.execute("echo", CommandArgs::new().with("text", " hi ")).await;
        assert!(ok.success);
        assert_eq!(ok.to_string(), "hi");

        let missing = catalog.execute("echo", CommandArgs::new()).await;
        assert!(!missing.success);
        assert_eq!(missing.error, Some(ErrorKind::Argument));
        assert!(missing.text.contains("Missing required argument 'text'"));

        let unknown = catalog.execute("nope", CommandArgs::new()).await;
        assert!(!unknown.success);
        assert_eq!(unknown.text, "Error executing nope: Unknown command 'nope'");
    }

    #[test]
    fn test_args_conversions() {
        let args: CommandArgs = [
            ("count", "7"),
            ("tweet_id", " 0012 "),
            ("bad", "x1"),
            ("signed", "+12"),
            ("huge", "99999999999999999999999"),
            ("zero", "0"),
        ]
        .into_iter()
        .collect();
        assert_eq!(args.count("count").unwrap(), 7);
        assert_eq!(args.id("tweet_id").unwrap(), "0012");
        assert!(matches!(args.id("bad"), Err(TwitterError::InvalidArgument { .. })));
        assert!(matches!(args.id("signed"), Err(TwitterError::InvalidArgument { .. })));
        assert!(matches!(args.id("huge"), Err(TwitterError::InvalidArgument { .. })));
        assert!(matches!(args.count("zero"), Err(TwitterError::InvalidArgument { .. })));
        assert!(matches!(args.count("missing"), Err(TwitterError::MissingArgument(_))));
        assert_eq!(args.count_or("missing", 10).unwrap(), 10);
        assert!(args.count_or("bad", 10).is_err());
    }

    #[test]
    fn test_text_keeps_surrounding_whitespace() {
        let body = "  fn main() {\n    println!(\"hi\");\n}\n";
        let args = CommandArgs::new().with("tweet_text", body).with("blank", " \n ");
        assert_eq!(args.text("tweet_text").unwrap(), body);
        assert_eq!(args.required("tweet_text").unwrap(), body.trim());
        assert!(matches!(args.text("blank"), Err(TwitterError::MissingArgument(_))));
        assert!(matches!(args.text("absent"), Err(TwitterError::MissingArgument(_))));
    }

    #[test]
    fn test_args_from_json() {
        let args = CommandArgs::from_json(&json!({
            "tweet_id": 1234567890123u64,
            "tweet_text": "hello",
            "flag": true,
            "skip": null
        }))
        .unwrap();
        assert_eq!(args.get("tweet_id"), Some("1234567890123"));
        assert_eq!(args.get("tweet_text"), Some("hello"));
        assert_eq!(args.get("flag"), Some("true"));
        assert_eq!(args.get("skip"), None);
        assert_eq!(args.len(), 3);

        assert!(CommandArgs::from_json(&json!(["not", "an", "object"])).is_err());
        assert!(CommandArgs::from_json(&json!({ "nested": { "a": 1 } })).is_err());
    }
}
