//! Error types for the Twitter commands plugin.

use thiserror::Error;

/// Result type for Twitter operations.
pub type Result<T> = std::result::Result<T, TwitterError>;

/// Coarse classification of a [`TwitterError`], reported back to the host
/// alongside the failure text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied a missing or malformed argument.
    Argument,
    /// The X API (or the transport to it) rejected the call.
    Remote,
    /// The plugin itself is misconfigured.
    Configuration,
}

/// Error types for Twitter client and command operations.
#[derive(Error, Debug)]
pub enum TwitterError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Twitter API error with status code and message
    #[error("Twitter API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// The API answered 429
    #[error("Rate limit exceeded{}", reset_suffix(.reset_at))]
    RateLimited {
        /// Unix timestamp from `x-rate-limit-reset`, if sent
        reset_at: Option<i64>,
    },

    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Empty response from API
    #[error("Empty response from API")]
    EmptyResponse,

    /// Required command argument was not supplied
    #[error("Missing required argument '{0}'")]
    MissingArgument(String),

    /// Command argument could not be converted
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Argument name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// No command registered under this name
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    /// Two commands registered under the same name
    #[error("Command '{0}' is already registered")]
    DuplicateCommand(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

fn reset_suffix(reset_at: &Option<i64>) -> String {
    reset_at
        .map(|t| format!(" (resets at unix time {t})"))
        .unwrap_or_default()
}

impl TwitterError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingArgument(_) | Self::InvalidArgument { .. } | Self::UnknownCommand(_) => {
                ErrorKind::Argument
            }
            Self::DuplicateCommand(_) | Self::ConfigError(_) => ErrorKind::Configuration,
            Self::HttpError(_)
            | Self::ApiError { .. }
            | Self::RateLimited { .. }
            | Self::ParseError(_)
            | Self::EmptyResponse => ErrorKind::Remote,
        }
    }

    pub(crate) fn invalid_argument(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
