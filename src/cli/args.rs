//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

use crate::domain::recording::Duration;

/// All valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "api_base",
    "chat_model",
    "transcription_model",
    "advisory_limit",
    "language",
];

/// Check whether a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

/// HavenChat - confidential support chat with voice messages
#[derive(Parser, Debug)]
#[command(name = "haven-chat")]
#[command(version = "1.0.0")]
#[command(about = "Confidential support chat: record a voice message or type, get a supportive reply")]
#[command(long_about = None)]
pub struct Cli {
    /// Send a typed message instead of recording a voice message
    #[arg(short = 'm', long, value_name = "TEXT")]
    pub message: Option<String>,

    /// Language for replies (e.g., Spanish)
    #[arg(short = 'l', long, value_name = "LANGUAGE")]
    pub language: Option<String>,

    /// Advisory recording limit (e.g., 2m, 300s); recording is never
    /// cut off, a warning is shown instead
    #[arg(long, value_name = "TIME")]
    pub advisory_limit: Option<String>,

    /// Send immediately after stopping, skipping the preview step
    #[arg(long)]
    pub no_preview: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Options for one support exchange
#[derive(Debug, Clone)]
pub struct ExchangeOptions {
    /// Typed message; None means record a voice message
    pub message: Option<String>,
    /// Reply language override
    pub language: Option<String>,
    /// Advisory recording limit
    pub advisory_limit: Duration,
    /// Skip the preview step after stopping
    pub skip_preview: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("api_key"));
        assert!(is_valid_config_key("advisory_limit"));
        assert!(!is_valid_config_key("unknown"));
    }

    #[test]
    fn parses_typed_message() {
        let cli = Cli::parse_from(["haven-chat", "-m", "hello"]);
        assert_eq!(cli.message.as_deref(), Some("hello"));
        assert!(!cli.no_preview);
    }

    #[test]
    fn parses_config_subcommand() {
        let cli = Cli::parse_from(["haven-chat", "config", "get", "api_key"]);
        let Some(Commands::Config {
            action: ConfigAction::Get { key },
        }) = cli.command
        else {
            panic!("expected config get");
        };
        assert_eq!(key, "api_key");
    }
}
