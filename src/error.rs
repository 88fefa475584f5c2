//! Error types for the bot's outer edge
//!
//! The formatting core never fails; these errors only come from remote APIs, configuration
//! and Discord. Callers at the edge log them and degrade to empty data.

use thiserror::Error;

/// Errors raised by configuration loading and remote API calls
#[derive(Debug, Error)]
pub enum BotError {
    /// HTTP transport or decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote service answered with something we can't use
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Vocabulary file could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Discord API error
    #[error("Discord API error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for BotError {
    fn from(error: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(error))
    }
}

/// Result type for edge operations
pub type BotResult<T> = Result<T, BotError>;
