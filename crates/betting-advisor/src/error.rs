//! Error Types for the Betting Advisor
//!
//! Display strings are user-facing: tools prefix them with a status marker
//! and hand them to the model verbatim.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Invalid API key (401 Unauthorized)")]
    Unauthorized,

    #[error("API quota exceeded (429 Too Many Requests)")]
    QuotaExceeded,

    #[error("API error (code {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Connection error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Invalid sport key '{0}': use keys like 'soccer_epl'")]
    InvalidSportKey(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AdvisorError {
    /// Map a non-success HTTP status
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => Self::Unauthorized,
            429 => Self::QuotaExceeded,
            _ => Self::Api { status, body },
        }
    }
}
