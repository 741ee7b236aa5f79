//! Error Types

use thiserror::Error;

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;

/// Bot error types
#[derive(Error, Debug)]
pub enum BotError {
    /// No flow registered under the given name
    #[error("Flow not found: {0}")]
    FlowNotFound(String),

    /// Incoming event could not be handled by the active flow
    #[error("Flow error: {0}")]
    Flow(String),

    /// User input failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Session store failure
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limited by a collaborator
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl BotError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BotError::RateLimited(_) | BotError::Io(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            BotError::FlowNotFound(_) => {
                "That option is not available. Send /start to see the menu.".into()
            }
            BotError::Flow(_) => {
                "Something went wrong while processing your request. Please try again.".into()
            }
            BotError::InvalidInput(msg) => format!("Invalid input: {}", msg),
            BotError::RateLimited(_) => {
                "You've made too many requests. Please wait a moment.".into()
            }
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for BotError {
    fn from(err: anyhow::Error) -> Self {
        BotError::Other(err.to_string())
    }
}
