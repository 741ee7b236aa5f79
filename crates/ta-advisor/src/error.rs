//! Error Types for the TA Advisor

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid position: entry, stop and target do not form a long or short setup")]
    InvalidPosition,

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdvisorError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AdvisorError::InsufficientData(_) => {
                "Not enough data to run this calculation. Please pick another timeframe.".into()
            }
            AdvisorError::InvalidPosition => {
                "The entered values are not valid. Make sure they describe a long or short position."
                    .into()
            }
            AdvisorError::Chart(_) => "The chart could not be rendered.".into(),
            AdvisorError::Network(_) => {
                "The market data provider is unavailable. Please try again later.".into()
            }
            AdvisorError::Serialization(_) => "An unexpected error occurred.".into(),
        }
    }
}

impl From<AdvisorError> for bot_core::BotError {
    fn from(err: AdvisorError) -> Self {
        bot_core::BotError::Flow(err.to_string())
    }
}
