//! Store-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unauthorized: the service key was rejected")]
    Unauthorized,

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Remote API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "The database rejected the service key. Check your settings.".to_string(),
            Self::UnknownTable(t) => format!("The hosted database has no '{}' table.", t),
            Self::Api(_) => "The hosted database returned an error. Changes are saved locally.".to_string(),
            Self::Network(_) => "Network error. Changes are saved locally.".to_string(),
            Self::Serialization(_) => "Received malformed data from the hosted database.".to_string(),
        }
    }
}
