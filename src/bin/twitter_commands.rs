//! Twitter commands CLI
//!
//! Minimal host for the command plugin: lists the catalog or runs a single
//! command with `key=value` arguments.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use elizaos_plugin_twitter_commands::{AgentPlugin, CommandArgs, TwitterConfig, TwitterPlugin};

#[derive(Parser)]
#[command(name = "twitter-commands")]
#[command(version)]
#[command(about = "Run Twitter/X API commands from the terminal", long_about = None)]
struct Cli {
    /// Simulate mutating calls instead of sending them
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered commands
    #[command(alias = "ls")]
    List,

    /// Run one command
    #[command(alias = "r")]
    Run {
        /// Command name, e.g. search_tweets
        name: String,

        /// Arguments as key=value pairs
        #[arg(value_parser = parse_arg)]
        args: Vec<(String, String)>,
    },
}

fn parse_arg(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let _ = dotenvy::dotenv();
    let mut config = TwitterConfig::from_env().context("failed to configure Twitter client")?;
    if cli.dry_run {
        config = config.dry_run(true);
    }
    let plugin = TwitterPlugin::from_config(config)?;
    let catalog = plugin.catalog()?;

    match cli.command {
        Commands::List => {
            println!("{} v{}", plugin.name(), plugin.version());
            println!("{}", catalog.describe());
        }
        Commands::Run { name, args } => {
            if catalog.get(&name).is_none() {
                return Err(anyhow!(
                    "unknown command '{}'; available: {}",
                    name,
                    catalog.names().join(", ")
                ));
            }
            let output = catalog.execute(&name, args.into_iter().collect::<CommandArgs>()).await;
            println!("{}", output.text);
            if !output.success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arg() {
        assert_eq!(
            parse_arg("query=a=b").unwrap(),
            ("query".to_string(), "a=b".to_string())
        );
        assert!(parse_arg("novalue").is_err());
        assert!(parse_arg("=x").is_err());
    }

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from(["twitter-commands", "run", "like_tweet", "tweet_id=5"]).unwrap();
        match cli.command {
            Commands::Run { name, args } => {
                assert_eq!(name, "like_tweet");
                assert_eq!(args, vec![("tweet_id".to_string(), "5".to_string())]);
            }
            Commands::List => panic!("expected run"),
        }
    }
}
